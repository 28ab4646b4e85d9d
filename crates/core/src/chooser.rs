//! Single-resolution adapter over the callback-based cloud chooser.
//!
//! The chooser reports through two callbacks (`success`, `cancel`) that it
//! may, in principle, invoke more than once. [`ChooserCallbacks`] funnels both
//! into a one-shot completion: the first call settles the result, every later
//! call is dropped.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use jbs_protocol::{ChooserFile, ChooserOptions, SourceDescriptor};
use tracing::{debug, warn};

use crate::error::{Result, SessionError};

/// The third-party chooser global (`Dropbox.choose`).
pub trait CloudChooser {
	/// Provider name used in messages, e.g. `"Dropbox"`.
	fn provider(&self) -> &'static str;

	/// Returns true if the chooser script is loaded right now.
	fn is_available(&self) -> bool;

	/// Opens the chooser. The implementation must route the chooser's
	/// `success`/`cancel` callbacks to `callbacks`.
	///
	/// # Errors
	///
	/// Returns an error if the chooser could not be opened at all.
	fn choose(&self, options: &ChooserOptions, callbacks: ChooserCallbacks) -> Result<()>;
}

/// How the chooser settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChooserOutcome {
	Selected(Vec<ChooserFile>),
	Cancelled,
}

/// One-shot completion guard: [`complete`](Self::complete) delivers at most once.
pub struct OneShot<T> {
	tx: RefCell<Option<oneshot::Sender<T>>>,
}

impl<T> OneShot<T> {
	pub fn new() -> (Self, oneshot::Receiver<T>) {
		let (tx, rx) = oneshot::channel();
		(
			Self {
				tx: RefCell::new(Some(tx)),
			},
			rx,
		)
	}

	/// Delivers `value` if nothing was delivered yet. Returns whether it was.
	pub fn complete(&self, value: T) -> bool {
		let Some(tx) = self.tx.borrow_mut().take() else {
			return false;
		};
		// A dropped receiver means the caller stopped waiting; still settled.
		let _ = tx.send(value);
		true
	}
}

/// Callback pair handed to [`CloudChooser::choose`]. Cheap to clone.
#[derive(Clone)]
pub struct ChooserCallbacks {
	completion: Rc<OneShot<ChooserOutcome>>,
}

impl ChooserCallbacks {
	pub fn new() -> (Self, oneshot::Receiver<ChooserOutcome>) {
		let (completion, rx) = OneShot::new();
		(
			Self {
				completion: Rc::new(completion),
			},
			rx,
		)
	}

	/// The chooser's `success(files)` callback.
	pub fn success(&self, files: Vec<ChooserFile>) {
		let count = files.len();
		if !self.completion.complete(ChooserOutcome::Selected(files)) {
			warn!(target = "jbs", count, "Chooser success after settlement ignored");
		}
	}

	/// The chooser's `cancel()` callback.
	pub fn cancel(&self) {
		if !self.completion.complete(ChooserOutcome::Cancelled) {
			warn!(target = "jbs", "Chooser cancel after settlement ignored");
		}
	}
}

/// Opens `chooser` for a single file and waits for the user.
///
/// # Errors
///
/// - [`SessionError::ProviderUnavailable`] immediately if the chooser script is
///   not loaded
/// - [`SessionError::NoSelection`] if the chooser succeeded with no file
/// - [`SessionError::UserCancelled`] if the user cancelled
pub async fn choose_single(chooser: &dyn CloudChooser, options: &ChooserOptions) -> Result<ChooserFile> {
	if !chooser.is_available() {
		return Err(SessionError::ProviderUnavailable(chooser.provider()));
	}

	let (callbacks, rx) = ChooserCallbacks::new();
	chooser.choose(options, callbacks)?;

	match rx.await {
		Ok(ChooserOutcome::Selected(files)) => {
			debug!(target = "jbs", count = files.len(), "Chooser returned files");
			files
				.into_iter()
				.next()
				.ok_or(SessionError::NoSelection(SourceDescriptor::CloudPicker))
		}
		Ok(ChooserOutcome::Cancelled) => Err(SessionError::UserCancelled),
		// The chooser dropped its callbacks without calling either one.
		Err(oneshot::Canceled) => Err(SessionError::UserCancelled),
	}
}

#[cfg(test)]
mod tests {
	use futures::executor::block_on;

	use super::*;

	struct ScriptedChooser {
		available: bool,
		script: fn(&ChooserCallbacks),
	}

	impl CloudChooser for ScriptedChooser {
		fn provider(&self) -> &'static str {
			"Dropbox"
		}

		fn is_available(&self) -> bool {
			self.available
		}

		fn choose(&self, _options: &ChooserOptions, callbacks: ChooserCallbacks) -> Result<()> {
			(self.script)(&callbacks);
			Ok(())
		}
	}

	fn run(available: bool, script: fn(&ChooserCallbacks)) -> Result<ChooserFile> {
		let chooser = ScriptedChooser { available, script };
		block_on(choose_single(&chooser, &ChooserOptions::default()))
	}

	#[test]
	fn one_shot_delivers_once() {
		let (shot, mut rx) = OneShot::new();
		assert!(shot.complete(1));
		assert!(!shot.complete(2));
		assert_eq!(rx.try_recv().unwrap(), Some(1));
	}

	#[test]
	fn unavailable_provider_rejects_without_opening() {
		let err = run(false, |_| panic!("chooser must not open")).unwrap_err();
		assert!(matches!(err, SessionError::ProviderUnavailable("Dropbox")));
	}

	#[test]
	fn first_file_is_selected() {
		let file = run(true, |cb| {
			cb.success(vec![
				ChooserFile::from_link("https://www.dropbox.com/s/a/one.json?dl=0"),
				ChooserFile::from_link("https://www.dropbox.com/s/b/two.json?dl=0"),
			])
		})
		.unwrap();
		assert!(file.link.ends_with("one.json?dl=0"));
	}

	#[test]
	fn empty_selection_is_no_selection() {
		let err = run(true, |cb| cb.success(Vec::new())).unwrap_err();
		assert!(matches!(err, SessionError::NoSelection(SourceDescriptor::CloudPicker)));
	}

	#[test]
	fn cancel_is_user_cancelled() {
		assert!(run(true, |cb| cb.cancel()).unwrap_err().is_user_cancelled());
	}

	#[test]
	fn late_callbacks_are_ignored() {
		let err = run(true, |cb| {
			cb.cancel();
			cb.success(vec![ChooserFile::from_link("https://example.org/late.json")]);
			cb.cancel();
		})
		.unwrap_err();
		assert!(err.is_user_cancelled());
	}

	#[test]
	fn dropped_callbacks_count_as_cancel() {
		assert!(run(true, |_| {}).unwrap_err().is_user_cancelled());
	}
}
