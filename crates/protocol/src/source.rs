//! Where a session load came from.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies the channel that produced a [`SessionText`](crate::SessionText).
///
/// Created per load attempt and used as the diagnostic context of any error
/// raised while loading, parsing or restoring that session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SourceDescriptor {
	/// A file picked through the local file input.
	LocalFile,
	/// A URL typed into the session URL modal.
	#[serde(rename = "remoteURL")]
	RemoteUrl { url: String },
	/// A file picked through the cloud chooser.
	CloudPicker,
}

impl SourceDescriptor {
	pub fn remote(url: impl Into<String>) -> Self {
		Self::RemoteUrl { url: url.into() }
	}

	/// Short label used in log lines.
	pub fn label(&self) -> &'static str {
		match self {
			Self::LocalFile => "local file",
			Self::RemoteUrl { .. } => "URL",
			Self::CloudPicker => "Dropbox",
		}
	}
}

/// Renders as the "from ..." fragment prepended to load errors.
impl fmt::Display for SourceDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::LocalFile => write!(f, "from file"),
			Self::RemoteUrl { url } => write!(f, "from URL '{url}'"),
			Self::CloudPicker => write!(f, "from Dropbox"),
		}
	}
}
