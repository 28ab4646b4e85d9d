//! Binds the session controls to loading, restoring, saving and the modal.
//!
//! Every user action ends in exactly one of: silence (cancelled or ignored),
//! one message on the [`AlertChannel`], or a successful restore/save. Errors
//! never escape the handlers.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use chrono::Utc;
use jbs_protocol::{SessionArtifact, SourceDescriptor};
use tracing::{debug, error, info};

use crate::chooser::CloudChooser;
use crate::codec;
use crate::config::SessionWidgetsConfig;
use crate::dom::{Document, Scheduler};
use crate::engine::{Engine, StringLoader};
use crate::error::{Result, SessionError};
use crate::loader::{FileHandle, SourceLoader};
use crate::modal::ModalController;

/// Shown when the URL field is submitted empty.
pub const URL_REQUIRED_MESSAGE: &str = "Please enter a session file URL";
/// Shown after a successful save.
pub const SAVE_SUCCESS_MESSAGE: &str = "Session saved successfully";

/// The single user-facing message channel (`AlertSingleton.present`).
pub trait AlertChannel {
	fn present(&self, message: &str);
}

/// Turns a [`SessionArtifact`] into a browser download.
pub trait ArtifactSink {
	/// # Errors
	///
	/// Returns [`SessionError::Save`] if the download could not be started.
	fn deliver(&self, artifact: &SessionArtifact) -> Result<()>;
}

/// Enables or disables the load triggers while a load is in flight.
pub trait SessionControls {
	fn set_busy(&self, busy: bool);
}

/// The local session file input.
pub trait FileInput {
	fn selected_file(&self) -> Option<Rc<dyn FileHandle>>;

	/// Clears the input so picking the same file again still fires `change`.
	fn reset(&self);
}

/// The URL text field inside the modal.
pub trait TextField {
	fn value(&self) -> String;

	fn clear(&self);
}

/// How a user action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
	/// Session restored or saved.
	Completed,
	/// One message was posted to the alert channel.
	Failed,
	/// The user cancelled; nothing was reported.
	Cancelled,
	/// Nothing to do (no file picked, or another load in flight).
	Ignored,
}

/// Everything the coordinator talks to.
pub struct Collaborators<D: Document> {
	pub engine: Rc<dyn Engine>,
	pub fallback_loader: Rc<dyn StringLoader>,
	pub chooser: Rc<dyn CloudChooser>,
	pub document: Rc<D>,
	pub scheduler: Rc<dyn Scheduler>,
	pub alert: Rc<dyn AlertChannel>,
	pub sink: Rc<dyn ArtifactSink>,
	pub controls: Rc<dyn SessionControls>,
}

/// Clears the busy flag and re-enables the controls when dropped, on every
/// exit path of a load.
struct BusyGuard {
	busy: Rc<Cell<bool>>,
	controls: Rc<dyn SessionControls>,
}

impl Drop for BusyGuard {
	fn drop(&mut self) {
		self.busy.set(false);
		self.controls.set_busy(false);
	}
}

/// Session load/save coordinator for one page.
pub struct SessionCoordinator<D: Document> {
	loader: SourceLoader,
	engine: Rc<dyn Engine>,
	modal: ModalController<D>,
	scheduler: Rc<dyn Scheduler>,
	alert: Rc<dyn AlertChannel>,
	sink: Rc<dyn ArtifactSink>,
	controls: Rc<dyn SessionControls>,
	artifact_prefix: String,
	focus_delay: Duration,
	busy: Rc<Cell<bool>>,
}

impl<D: Document + 'static> SessionCoordinator<D> {
	pub fn new(parts: Collaborators<D>, config: &SessionWidgetsConfig) -> Self {
		let mut loader = SourceLoader::new(
			Rc::clone(&parts.engine),
			parts.fallback_loader,
			parts.chooser,
			config.chooser_options(),
		);
		if let Some(timeout) = config.fetch_timeout() {
			loader = loader.with_fetch_timeout(Rc::clone(&parts.scheduler), timeout);
		}
		let modal = ModalController::init(
			parts.document,
			Rc::clone(&parts.scheduler),
			config.transition_delay(),
		);
		Self {
			loader,
			engine: parts.engine,
			modal,
			scheduler: parts.scheduler,
			alert: parts.alert,
			sink: parts.sink,
			controls: parts.controls,
			artifact_prefix: config.artifact_prefix.clone(),
			focus_delay: config.focus_delay(),
			busy: Rc::new(Cell::new(false)),
		}
	}

	pub fn modal(&self) -> &ModalController<D> {
		&self.modal
	}

	pub fn loader(&self) -> &SourceLoader {
		&self.loader
	}

	/// Returns true while a load-and-restore sequence is in flight.
	pub fn is_busy(&self) -> bool {
		self.busy.get()
	}

	/// `change` on the local file input.
	pub async fn on_file_selected(&self, input: &dyn FileInput) -> Outcome {
		let file = input.selected_file();
		input.reset();
		let Some(file) = file else {
			debug!(target = "jbs", "File input changed without a file");
			return Outcome::Ignored;
		};

		let origin = SourceDescriptor::LocalFile;
		let Some(_guard) = self.begin_load(&origin) else {
			return Outcome::Ignored;
		};
		let result = async {
			let text = self.loader.load_from_file(file.as_ref()).await?;
			self.restore_text(&text, &origin).await
		}
		.await;
		self.finish_load(&origin, result)
	}

	/// Click on the cloud-provider button.
	pub async fn on_cloud_requested(&self) -> Outcome {
		let origin = SourceDescriptor::CloudPicker;
		let Some(_guard) = self.begin_load(&origin) else {
			return Outcome::Ignored;
		};
		let result = async {
			let text = self.loader.load_from_cloud_picker().await?;
			self.restore_text(&text, &origin).await
		}
		.await;
		self.finish_load(&origin, result)
	}

	/// Click on the dropdown entry that opens the URL modal. `focus` receives
	/// input focus shortly after the modal is shown.
	pub fn open_url_modal(&self, modal: Option<&D::Node>, focus: Option<D::Node>) {
		self.modal.show(modal);
		if let (Some(_), Some(target)) = (modal, focus) {
			let document = Rc::clone(self.modal.document());
			self.scheduler
				.defer(self.focus_delay, Box::new(move || document.focus(&target)));
		}
	}

	/// Submit in the URL modal (button click or Enter).
	///
	/// On success the field is cleared and `modal` hidden; on failure both
	/// stay as they are so the user can correct the URL.
	pub async fn on_url_submitted(&self, field: &dyn TextField, modal: Option<&D::Node>) -> Outcome {
		let url = field.value().trim().to_string();
		if url.is_empty() {
			self.alert.present(URL_REQUIRED_MESSAGE);
			return Outcome::Failed;
		}

		let origin = SourceDescriptor::remote(url.as_str());
		let Some(_guard) = self.begin_load(&origin) else {
			return Outcome::Ignored;
		};
		let result = async {
			let text = self.loader.load_from_url(&url).await?;
			self.restore_text(&text, &origin).await
		}
		.await;

		let outcome = self.finish_load(&origin, result);
		if outcome == Outcome::Completed {
			field.clear();
			self.modal.hide(modal);
		}
		outcome
	}

	/// Click on the save button.
	pub fn on_save_requested(&self) -> Outcome {
		match self.save() {
			Ok(artifact) => {
				info!(target = "jbs", filename = %artifact.filename, bytes = artifact.text.len(), "Session saved");
				self.alert.present(SAVE_SUCCESS_MESSAGE);
				Outcome::Completed
			}
			Err(err) => {
				error!(target = "jbs", error = %err, "Error saving session");
				self.alert.present(&format!("Error saving session: {err}"));
				Outcome::Failed
			}
		}
	}

	/// Snapshots the engine and hands the artifact to the sink.
	///
	/// # Errors
	///
	/// Returns [`SessionError::Save`] if the engine, the codec or the sink fails.
	pub fn save(&self) -> Result<SessionArtifact> {
		let session = self
			.engine
			.serialize()
			.map_err(|e| SessionError::Save(format!("failed to read engine state: {e}")))?;
		let text = codec::serialize(&session)?;
		let artifact = SessionArtifact::new(&self.artifact_prefix, Utc::now(), text);
		self.sink.deliver(&artifact)?;
		Ok(artifact)
	}

	async fn restore_text(&self, text: &str, origin: &SourceDescriptor) -> Result<()> {
		let session = codec::parse(text, origin)?;
		self.engine
			.restore(session)
			.await
			.map_err(|e| SessionError::Restore(e.to_string()))
	}

	fn begin_load(&self, origin: &SourceDescriptor) -> Option<BusyGuard> {
		if self.busy.replace(true) {
			debug!(target = "jbs", source = origin.label(), "Load already in flight; trigger ignored");
			return None;
		}
		self.controls.set_busy(true);
		Some(BusyGuard {
			busy: Rc::clone(&self.busy),
			controls: Rc::clone(&self.controls),
		})
	}

	fn finish_load(&self, origin: &SourceDescriptor, result: Result<()>) -> Outcome {
		match result {
			Ok(()) => {
				info!(target = "jbs", "Session loaded successfully from {}", origin.label());
				Outcome::Completed
			}
			Err(err) if err.is_user_cancelled() => {
				debug!(target = "jbs", source = origin.label(), "Session selection cancelled");
				Outcome::Cancelled
			}
			Err(err) => {
				error!(target = "jbs", source = origin.label(), error = %err, "Error loading session");
				self.alert.present(&format!("Error loading session: {err}"));
				Outcome::Failed
			}
		}
	}
}
