//! The opaque session payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Wire form of a session: the JSON text read from a file, URL or download.
pub type SessionText = String;

/// Parsed session state as produced by the engine's `toJSON`.
///
/// The schema belongs to the engine. This type only guarantees that the
/// payload is a JSON object and that its key order is kept, so a session that
/// is saved and reloaded round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionObject(Map<String, Value>);

impl SessionObject {
	/// Creates an empty session.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	/// Inserts a top-level field, returning the previous value if any.
	pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
		self.0.insert(key.into(), value)
	}

	/// Number of top-level fields.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Borrows the underlying JSON object.
	pub fn as_map(&self) -> &Map<String, Value> {
		&self.0
	}

	pub fn into_map(self) -> Map<String, Value> {
		self.0
	}
}

impl From<Map<String, Value>> for SessionObject {
	fn from(map: Map<String, Value>) -> Self {
		Self(map)
	}
}

impl TryFrom<Value> for SessionObject {
	/// The rejected value is handed back unchanged.
	type Error = Value;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::Object(map) => Ok(Self(map)),
			other => Err(other),
		}
	}
}

impl From<SessionObject> for Value {
	fn from(session: SessionObject) -> Self {
		Value::Object(session.0)
	}
}
