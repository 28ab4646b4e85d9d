//! Class names and notification events of the hand-rolled modal dialog.
//!
//! Names follow Bootstrap 4 so existing stylesheets and listeners keep working.

/// Class of the overlay element shown behind an open modal.
pub const BACKDROP_CLASS: &str = "modal-backdrop";
/// Class enabling the opacity transition on the backdrop.
pub const FADE_CLASS: &str = "fade";
/// Visibility class toggled on both the modal and the backdrop.
pub const SHOW_CLASS: &str = "show";
/// Class set on `<body>` while a modal is open.
pub const MODAL_OPEN_CLASS: &str = "modal-open";
/// Key value that dismisses an open modal.
pub const ESCAPE_KEY: &str = "Escape";

/// Visibility state of a single modal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModalState {
	#[default]
	Hidden,
	Shown,
}

/// Notification dispatched on a modal after a visibility change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalEvent {
	Shown,
	Hidden,
}

impl ModalEvent {
	/// DOM event type dispatched on the modal element.
	pub fn event_type(self) -> &'static str {
		match self {
			Self::Shown => "shown.bs.modal",
			Self::Hidden => "hidden.bs.modal",
		}
	}
}

impl std::fmt::Display for ModalEvent {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.event_type())
	}
}
