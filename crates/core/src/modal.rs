//! Hand-rolled modal dialog lifecycle with a single shared backdrop.
//!
//! [`ModalController`] is the only owner of the backdrop element and of the
//! body-level `modal-open` class. Invariants:
//!
//! - at most one backdrop exists at any time
//! - once pending removals have run, the backdrop exists iff a modal is shown
//! - `show`/`hide` are idempotent per modal

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use jbs_protocol::{ESCAPE_KEY, MODAL_OPEN_CLASS, ModalEvent, ModalState, SHOW_CLASS};
use tracing::{debug, trace, warn};

use crate::dom::{Document, Scheduler};

struct State<N> {
	backdrop: Option<N>,
	shown: Vec<N>,
	/// Bumped whenever a scheduled removal must be invalidated.
	removal_token: u64,
}

struct Inner<D: Document> {
	document: Rc<D>,
	scheduler: Rc<dyn Scheduler>,
	transition: Duration,
	state: RefCell<State<D::Node>>,
}

/// Shows and hides modals over a [`Document`].
///
/// Cloning yields another handle to the same controller.
pub struct ModalController<D: Document> {
	inner: Rc<Inner<D>>,
}

impl<D: Document> Clone for ModalController<D> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<D: Document + 'static> ModalController<D> {
	/// Creates the page's controller. `transition` is the backdrop fade
	/// duration; removal is deferred by that much after the last hide.
	pub fn init(document: Rc<D>, scheduler: Rc<dyn Scheduler>, transition: Duration) -> Self {
		Self {
			inner: Rc::new(Inner {
				document,
				scheduler,
				transition,
				state: RefCell::new(State {
					backdrop: None,
					shown: Vec::new(),
					removal_token: 0,
				}),
			}),
		}
	}

	pub fn document(&self) -> &Rc<D> {
		&self.inner.document
	}

	pub fn state(&self, modal: &D::Node) -> ModalState {
		if self.inner.state.borrow().shown.contains(modal) {
			ModalState::Shown
		} else {
			ModalState::Hidden
		}
	}

	/// Returns true while a backdrop element is attached (including its fade-out).
	pub fn has_backdrop(&self) -> bool {
		self.inner.state.borrow().backdrop.is_some()
	}

	pub fn any_shown(&self) -> bool {
		!self.inner.state.borrow().shown.is_empty()
	}

	/// Shows `modal`. No-op for `None`; an already shown modal is only refocused.
	pub fn show(&self, modal: Option<&D::Node>) {
		let Some(modal) = modal else { return };
		let doc = &self.inner.document;

		if self.state(modal) == ModalState::Shown {
			trace!(target = "jbs", ?modal, "Modal already shown");
			doc.focus(modal);
			return;
		}

		if let Some(backdrop) = self.ensure_backdrop() {
			doc.add_class(&backdrop, SHOW_CLASS);
		}
		self.inner.state.borrow_mut().shown.push(modal.clone());

		doc.ensure_focusable(modal);
		doc.add_class(modal, SHOW_CLASS);
		doc.set_displayed(modal, true);
		doc.set_body_class(MODAL_OPEN_CLASS, true);
		doc.focus(modal);
		debug!(target = "jbs", ?modal, "Modal shown");
		doc.dispatch(modal, ModalEvent::Shown);
	}

	/// Hides `modal`. No-op for `None` or a modal that is not shown.
	pub fn hide(&self, modal: Option<&D::Node>) {
		let Some(modal) = modal else { return };
		let doc = &self.inner.document;

		let (last, backdrop, token) = {
			let mut state = self.inner.state.borrow_mut();
			let Some(pos) = state.shown.iter().position(|m| m == modal) else {
				trace!(target = "jbs", ?modal, "Modal already hidden");
				return;
			};
			state.shown.remove(pos);
			let last = state.shown.is_empty();
			if last {
				state.removal_token += 1;
			}
			(last, state.backdrop.clone(), state.removal_token)
		};

		doc.remove_class(modal, SHOW_CLASS);
		doc.set_displayed(modal, false);

		if last {
			doc.set_body_class(MODAL_OPEN_CLASS, false);
			if let Some(backdrop) = backdrop {
				doc.remove_class(&backdrop, SHOW_CLASS);
				self.schedule_backdrop_removal(token);
			}
		}

		debug!(target = "jbs", ?modal, "Modal hidden");
		doc.dispatch(modal, ModalEvent::Hidden);
	}

	/// Explicit close control (`.close`, `[data-dismiss="modal"]`).
	pub fn close_requested(&self, modal: &D::Node) {
		self.hide(Some(modal));
	}

	/// Click inside the modal element. Only a click on the modal's own
	/// backdrop region (not its content) dismisses it.
	pub fn handle_click(&self, modal: &D::Node, target: &D::Node) {
		if target == modal {
			self.hide(Some(modal));
		}
	}

	/// Keydown inside the modal. Escape dismisses a shown modal.
	pub fn handle_key(&self, modal: &D::Node, key: &str) {
		if key == ESCAPE_KEY && self.state(modal) == ModalState::Shown {
			self.hide(Some(modal));
		}
	}

	fn ensure_backdrop(&self) -> Option<D::Node> {
		let mut state = self.inner.state.borrow_mut();
		// Whatever removal is pending belongs to a previous hide.
		state.removal_token += 1;
		if state.backdrop.is_none() {
			state.backdrop = self.inner.document.create_backdrop();
			if state.backdrop.is_none() {
				warn!(target = "jbs", "Backdrop could not be created");
			}
		}
		state.backdrop.clone()
	}

	fn schedule_backdrop_removal(&self, token: u64) {
		let weak: Weak<Inner<D>> = Rc::downgrade(&self.inner);
		self.inner.scheduler.defer(
			self.inner.transition,
			Box::new(move || {
				if let Some(inner) = weak.upgrade() {
					inner.remove_backdrop(token);
				}
			}),
		);
	}
}

impl<D: Document> Inner<D> {
	fn remove_backdrop(&self, token: u64) {
		let backdrop = {
			let mut state = self.state.borrow_mut();
			if state.removal_token != token || !state.shown.is_empty() {
				trace!(target = "jbs", "Stale backdrop removal skipped");
				return;
			}
			state.backdrop.take()
		};
		if let Some(backdrop) = backdrop {
			self.document.remove(&backdrop);
			trace!(target = "jbs", "Backdrop removed");
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::{Cell, RefCell};

	use super::*;

	#[derive(Default)]
	struct CountingDoc {
		next: Cell<u32>,
		attached: RefCell<Vec<u32>>,
		events: RefCell<Vec<(u32, ModalEvent)>>,
	}

	impl Document for CountingDoc {
		type Node = u32;

		fn create_backdrop(&self) -> Option<u32> {
			let id = 1000 + self.next.get();
			self.next.set(self.next.get() + 1);
			self.attached.borrow_mut().push(id);
			Some(id)
		}

		fn remove(&self, node: &u32) {
			self.attached.borrow_mut().retain(|n| n != node);
		}

		fn add_class(&self, _: &u32, _: &str) {}

		fn remove_class(&self, _: &u32, _: &str) {}

		fn set_displayed(&self, _: &u32, _: bool) {}

		fn set_body_class(&self, _: &str, _: bool) {}

		fn ensure_focusable(&self, _: &u32) {}

		fn focus(&self, _: &u32) {}

		fn dispatch(&self, node: &u32, event: ModalEvent) {
			self.events.borrow_mut().push((*node, event));
		}
	}

	#[derive(Default)]
	struct Timers(RefCell<Vec<Box<dyn FnOnce()>>>);

	impl Scheduler for Timers {
		fn defer(&self, _delay: Duration, task: Box<dyn FnOnce()>) {
			self.0.borrow_mut().push(task);
		}
	}

	impl Timers {
		fn flush(&self) {
			let tasks: Vec<_> = self.0.borrow_mut().drain(..).collect();
			for task in tasks {
				task();
			}
		}
	}

	fn controller() -> (ModalController<CountingDoc>, Rc<CountingDoc>, Rc<Timers>) {
		let doc = Rc::new(CountingDoc::default());
		let timers = Rc::new(Timers::default());
		let modal = ModalController::init(Rc::clone(&doc), timers.clone(), Duration::from_millis(150));
		(modal, doc, timers)
	}

	#[test]
	fn none_is_ignored() {
		let (modal, doc, _) = controller();
		modal.show(None);
		modal.hide(None);
		assert!(doc.attached.borrow().is_empty());
		assert!(doc.events.borrow().is_empty());
	}

	#[test]
	fn double_show_reuses_backdrop_and_notifies_once() {
		let (modal, doc, _) = controller();
		modal.show(Some(&1));
		modal.show(Some(&1));
		assert_eq!(doc.attached.borrow().len(), 1);
		assert_eq!(*doc.events.borrow(), [(1, ModalEvent::Shown)]);
	}

	#[test]
	fn escape_only_dismisses_shown_modal() {
		let (modal, doc, _) = controller();
		modal.handle_key(&1, "Escape");
		assert!(doc.events.borrow().is_empty());

		modal.show(Some(&1));
		modal.handle_key(&1, "Enter");
		assert_eq!(modal.state(&1), ModalState::Shown);
		modal.handle_key(&1, "Escape");
		assert_eq!(modal.state(&1), ModalState::Hidden);
	}

	#[test]
	fn content_click_does_not_dismiss() {
		let (modal, _, _) = controller();
		modal.show(Some(&1));
		modal.handle_click(&1, &7);
		assert_eq!(modal.state(&1), ModalState::Shown);
		modal.handle_click(&1, &1);
		assert_eq!(modal.state(&1), ModalState::Hidden);
	}

	#[test]
	fn stale_removal_keeps_newer_backdrop() {
		let (modal, doc, timers) = controller();
		modal.show(Some(&1));
		modal.hide(Some(&1));
		modal.show(Some(&1));
		timers.flush();
		assert_eq!(doc.attached.borrow().len(), 1);
		assert!(modal.has_backdrop());

		modal.hide(Some(&1));
		timers.flush();
		assert!(doc.attached.borrow().is_empty());
		assert!(!modal.has_backdrop());
	}

	#[test]
	fn backdrop_stays_while_another_modal_is_open() {
		let (modal, doc, timers) = controller();
		modal.show(Some(&1));
		modal.show(Some(&2));
		modal.hide(Some(&1));
		timers.flush();
		assert_eq!(doc.attached.borrow().len(), 1);
		modal.hide(Some(&2));
		timers.flush();
		assert!(doc.attached.borrow().is_empty());
	}

	#[test]
	fn dropped_controller_makes_pending_removal_a_noop() {
		let (modal, doc, timers) = controller();
		modal.show(Some(&1));
		modal.hide(Some(&1));
		drop(modal);
		timers.flush();
		assert_eq!(doc.attached.borrow().len(), 1);
	}
}
