//! Option and result shapes of the third-party cloud chooser (`Dropbox.choose`).
//!
//! The callbacks (`success`, `cancel`) are attached by the page bindings; only
//! the plain-data part of the configuration object is modelled here.

use serde::{Deserialize, Serialize};

/// Kind of link the chooser hands back for each selected file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
	/// Shareable preview page. The engine's loader rewrites these into
	/// direct-download URLs.
	#[default]
	Preview,
	/// Short-lived direct link.
	Direct,
}

/// Plain-data part of the chooser configuration object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChooserOptions {
	pub link_type: LinkType,
	pub multiselect: bool,
	pub folderselect: bool,
	pub extensions: Vec<String>,
}

impl ChooserOptions {
	/// Exactly one file, no folders, restricted to `extensions`.
	pub fn single_file(link_type: LinkType, extensions: Vec<String>) -> Self {
		Self {
			link_type,
			multiselect: false,
			folderselect: false,
			extensions,
		}
	}
}

impl Default for ChooserOptions {
	fn default() -> Self {
		Self::single_file(LinkType::Preview, vec![".json".to_string()])
	}
}

/// One entry of the array passed to the chooser's `success` callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChooserFile {
	/// Access link for the file, shaped by [`LinkType`].
	pub link: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// File size in bytes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub bytes: Option<u64>,
	#[serde(default)]
	pub is_dir: bool,
}

impl ChooserFile {
	pub fn from_link(link: impl Into<String>) -> Self {
		Self {
			link: link.into(),
			name: None,
			id: None,
			bytes: None,
			is_dir: false,
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn default_options_match_chooser_keys() {
		let value = serde_json::to_value(ChooserOptions::default()).unwrap();
		assert_eq!(
			value,
			json!({
				"linkType": "preview",
				"multiselect": false,
				"folderselect": false,
				"extensions": [".json"],
			})
		);
	}

	#[test]
	fn chooser_file_tolerates_extra_fields() {
		let file: ChooserFile = serde_json::from_value(json!({
			"id": "id:abc",
			"name": "session.json",
			"link": "https://www.dropbox.com/s/abc/session.json?dl=0",
			"bytes": 2048,
			"icon": "https://www.dropbox.com/static/images/icons64/page_white_code.png",
			"isDir": false,
		}))
		.unwrap();
		assert_eq!(file.name.as_deref(), Some("session.json"));
		assert_eq!(file.bytes, Some(2048));
		assert!(!file.is_dir);
	}
}
