//! Error types for session loading, restoring and saving.

use jbs_protocol::SourceDescriptor;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Every way a session load or save attempt can fail.
///
/// All variants except [`UserCancelled`](Self::UserCancelled) end up as a
/// single message on the alert channel. None are retried.
#[derive(Debug, Error)]
pub enum SessionError {
	/// Nothing was picked or entered.
	#[error("no session file selected")]
	NoSelection(SourceDescriptor),

	/// The cloud chooser script is not loaded on the page.
	#[error("{0} API not available")]
	ProviderUnavailable(&'static str),

	/// The user closed the cloud chooser. Never reported.
	#[error("file selection cancelled")]
	UserCancelled,

	/// The chooser is loaded but could not be opened.
	#[error("{provider} chooser failed: {message}")]
	Chooser { provider: &'static str, message: String },

	/// Network failure, non-2xx status or timeout while fetching a URL.
	#[error("failed to fetch '{url}': {message}")]
	Fetch { url: String, message: String },

	/// A local file could not be read.
	#[error("failed to read session file: {0}")]
	Read(String),

	/// The session text is not a JSON object.
	#[error("invalid session {origin}: {error}")]
	MalformedSession {
		origin: SourceDescriptor,
		#[source]
		error: serde_json::Error,
	},

	/// The engine refused the parsed session.
	#[error("restore failed: {0}")]
	Restore(String),

	/// Serializing the engine state or building the download failed.
	#[error("{0}")]
	Save(String),
}

impl SessionError {
	pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
		Self::Fetch {
			url: url.into(),
			message: message.into(),
		}
	}

	/// Returns true for the cancellation that must stay silent.
	pub fn is_user_cancelled(&self) -> bool {
		matches!(self, Self::UserCancelled)
	}
}

/// Failure reported by the visualization engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct EngineError(pub String);

impl EngineError {
	pub fn new(message: impl Into<String>) -> Self {
		Self(message.into())
	}
}

/// Invalid widget configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
	#[error("control id '{0}' must not be empty")]
	EmptyControlId(&'static str),

	#[error("artifact prefix must not be blank")]
	BlankPrefix,

	#[error("chooser needs at least one file extension")]
	NoExtensions,
}
