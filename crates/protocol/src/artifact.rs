//! The downloadable session file produced by a save.

use chrono::{DateTime, Utc};

/// MIME type of the downloaded session blob.
pub const ARTIFACT_MIME: &str = "application/json";

/// Filename prefix used when none is configured.
pub const DEFAULT_ARTIFACT_PREFIX: &str = "session";

/// A serialized session ready to be handed to the browser as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionArtifact {
	pub filename: String,
	pub mime: &'static str,
	pub text: String,
}

impl SessionArtifact {
	/// Builds the artifact for `text`, named after `saved_at`.
	pub fn new(prefix: &str, saved_at: DateTime<Utc>, text: String) -> Self {
		Self {
			filename: artifact_filename(prefix, saved_at),
			mime: ARTIFACT_MIME,
			text,
		}
	}
}

/// Returns `<prefix>-<timestamp>.json`.
///
/// The timestamp is the ISO 8601 UTC instant at seconds precision with `:`
/// and `.` replaced by `-`, e.g. `session-2024-03-05T14-07-09.json`.
pub fn artifact_filename(prefix: &str, saved_at: DateTime<Utc>) -> String {
	format!("{prefix}-{}.json", saved_at.format("%Y-%m-%dT%H-%M-%S"))
}
