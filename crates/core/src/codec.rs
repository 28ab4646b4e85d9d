//! Conversion between session text and [`SessionObject`].
//!
//! This is the only place JSON validity is checked.

use jbs_protocol::{SessionObject, SessionText, SourceDescriptor};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::{Result, SessionError};

/// Parses session text loaded from `origin`.
///
/// # Errors
///
/// Returns [`SessionError::MalformedSession`] when the text is not valid JSON
/// or is valid JSON but not an object. The underlying parse error is kept
/// as-is; `origin` only adds context.
pub fn parse(text: &str, origin: &SourceDescriptor) -> Result<SessionObject> {
	serde_json::from_str::<SessionObject>(text).map_err(|error| SessionError::MalformedSession {
		origin: origin.clone(),
		error,
	})
}

/// Serializes a session with two-space indentation, keeping key order.
///
/// # Errors
///
/// Returns [`SessionError::Save`] if serialization fails.
pub fn serialize(session: &SessionObject) -> Result<SessionText> {
	let mut buf = Vec::with_capacity(256);
	let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"  "));
	session
		.serialize(&mut ser)
		.map_err(|e| SessionError::Save(format!("failed to serialize session: {e}")))?;
	String::from_utf8(buf).map_err(|e| SessionError::Save(format!("session is not UTF-8: {e}")))
}
