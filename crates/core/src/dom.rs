//! The slice of the DOM the modal controller touches, plus deferred tasks.

use std::fmt;
use std::time::Duration;

use jbs_protocol::ModalEvent;

/// DOM operations needed to show and hide a modal.
///
/// `Node` is the element handle type; equality must mean "same element".
pub trait Document {
	type Node: Clone + PartialEq + fmt::Debug;

	/// Creates a `div.modal-backdrop.fade`, appends it to `<body>` and forces
	/// a layout so a following `show` class animates. `None` if the element
	/// could not be created; the modal then opens without a backdrop.
	fn create_backdrop(&self) -> Option<Self::Node>;

	/// Detaches `node` from the document. No-op if already detached.
	fn remove(&self, node: &Self::Node);

	fn add_class(&self, node: &Self::Node, class: &str);

	fn remove_class(&self, node: &Self::Node, class: &str);

	/// Sets inline `display` to `block` or `none`.
	fn set_displayed(&self, node: &Self::Node, displayed: bool);

	/// Toggles a class on `<body>`.
	fn set_body_class(&self, class: &str, enabled: bool);

	/// Gives `node` a `tabindex` of `-1` when it has none.
	fn ensure_focusable(&self, node: &Self::Node);

	fn focus(&self, node: &Self::Node);

	/// Dispatches a bubbling notification event on `node`.
	fn dispatch(&self, node: &Self::Node, event: ModalEvent);
}

/// Runs a task once after a delay on the same event loop (`setTimeout`).
pub trait Scheduler {
	fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>);
}
