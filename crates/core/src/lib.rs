//! Session persistence and modal dialog logic for the juicebox page.
//!
//! Loads a session from a local file, a URL or the Dropbox chooser, hands it
//! to the visualization engine, saves the engine state as a download, and
//! drives the URL modal without any UI framework.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │  SessionCoordinator  │  control handlers, busy guard, alert channel
//! └───┬──────┬───────┬───┘
//!     │      │       │
//! ┌───▼────┐ │ ┌─────▼───────────┐
//! │ Source │ │ │ ModalController │  show/hide, single backdrop
//! │ Loader │ │ └─────────────────┘
//! └───┬────┘ │
//!     │   ┌──▼─────┐
//!     │   │ codec  │  JSON parse/serialize
//!     │   └────────┘
//! ┌───▼──────────────────────────┐
//! │ Engine / StringLoader /      │  implemented by jbs-web over
//! │ CloudChooser / Document ...  │  wasm-bindgen, or by test doubles
//! └──────────────────────────────┘
//! ```
//!
//! Everything runs on the browser's single event loop: handles are `Rc`,
//! state is `RefCell`, and async traits are `?Send`.

pub mod chooser;
pub mod codec;
pub mod config;
pub mod coordinator;
pub mod dom;
pub mod engine;
pub mod error;
pub mod loader;
pub mod modal;

pub use chooser::{ChooserCallbacks, ChooserOutcome, CloudChooser, OneShot, choose_single};
pub use config::{ControlIds, SessionWidgetsConfig};
pub use coordinator::{
	AlertChannel, ArtifactSink, Collaborators, FileInput, Outcome, SAVE_SUCCESS_MESSAGE, SessionControls,
	SessionCoordinator, TextField, URL_REQUIRED_MESSAGE,
};
pub use dom::{Document, Scheduler};
pub use engine::{Engine, StringLoader};
pub use error::{ConfigError, EngineError, Result, SessionError};
pub use jbs_protocol as protocol;
pub use loader::{FileHandle, SourceLoader};
pub use modal::ModalController;
