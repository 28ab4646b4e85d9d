//! Seams to the visualization engine and to URL loaders.

use std::rc::Rc;

use async_trait::async_trait;
use jbs_protocol::{SessionObject, SessionText};

use crate::error::{EngineError, Result};

/// Fetches a URL as text.
///
/// Two implementations exist on the page: the engine's own loader, which
/// rewrites cloud-storage preview links into direct downloads, and a generic
/// `fetch` fallback. [`SourceLoader`](crate::SourceLoader) picks one per call.
#[async_trait(?Send)]
pub trait StringLoader {
	/// Name used in log lines.
	fn name(&self) -> &'static str;

	/// Loads `url` and returns its body.
	///
	/// # Errors
	///
	/// Returns [`SessionError::Fetch`](crate::SessionError::Fetch) on network
	/// failure, non-2xx status or timeout.
	async fn load_string(&self, url: &str) -> Result<SessionText>;
}

/// The embedded visualization engine.
///
/// The engine owns the meaning of the session payload; this crate only moves
/// it in and out. The restore container is bound by the implementation.
#[async_trait(?Send)]
pub trait Engine {
	/// Replaces the engine state with `session`.
	async fn restore(&self, session: SessionObject) -> std::result::Result<(), EngineError>;

	/// Snapshots the current engine state.
	fn serialize(&self) -> std::result::Result<SessionObject, EngineError>;

	/// Capability probe for the engine's preferred URL loader.
	///
	/// Evaluated on every URL load, since the engine may finish initializing
	/// after the widgets are wired.
	fn preferred_loader(&self) -> Option<Rc<dyn StringLoader>>;
}
