//! Widget configuration: control ids, chooser options, delays and log level.

use std::time::Duration;

use jbs_protocol::{ChooserOptions, DEFAULT_ARTIFACT_PREFIX, LinkType};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Delay between dropping the backdrop's `show` class and removing it.
///
/// Matches Bootstrap's fade transition.
pub const DEFAULT_TRANSITION_MS: u64 = 150;
/// Delay before a download's object URL is revoked.
pub const DEFAULT_REVOKE_DELAY_MS: u64 = 100;
/// Delay before the URL field receives focus after the modal opens.
pub const DEFAULT_FOCUS_DELAY_MS: u64 = 100;
/// Upper bound on a single URL fetch.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 30_000;

/// DOM ids of the controls the widgets bind to.
///
/// A missing element is skipped at binding time, never an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ControlIds {
	pub file_input: String,
	pub cloud_button: String,
	pub dropdown_menu: String,
	pub url_modal: String,
	pub url_input: String,
	pub url_submit: String,
	pub save_button: String,
}

impl Default for ControlIds {
	fn default() -> Self {
		Self {
			file_input: "igv-app-dropdown-local-session-file-input".into(),
			cloud_button: "igv-app-dropdown-dropbox-session-file-button".into(),
			dropdown_menu: "igv-session-dropdown-menu".into(),
			url_modal: "igv-app-session-url-modal".into(),
			url_input: "session-url-input".into(),
			url_submit: "session-url-load-btn".into(),
			save_button: "igv-app-save-session-button".into(),
		}
	}
}

impl ControlIds {
	/// Selector of the dropdown button that opens the URL modal.
	pub fn url_modal_trigger_selector(&self) -> String {
		format!("button[data-target=\"#{}\"]", self.url_modal)
	}

	fn entries(&self) -> [(&'static str, &str); 7] {
		[
			("fileInput", &self.file_input),
			("cloudButton", &self.cloud_button),
			("dropdownMenu", &self.dropdown_menu),
			("urlModal", &self.url_modal),
			("urlInput", &self.url_input),
			("urlSubmit", &self.url_submit),
			("saveButton", &self.save_button),
		]
	}
}

/// Configuration accepted by the page entry point.
///
/// Every field is optional on the wire; omitted fields take the defaults of
/// the stock juicebox page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionWidgetsConfig {
	pub controls: ControlIds,
	/// File extensions offered by the cloud chooser.
	pub chooser_extensions: Vec<String>,
	pub link_type: LinkType,
	pub transition_ms: u64,
	pub revoke_delay_ms: u64,
	pub focus_delay_ms: u64,
	/// Fetch timeout for URL and cloud loads. `0` disables it.
	pub fetch_timeout_ms: u64,
	/// Prefix of the downloaded filename.
	pub artifact_prefix: String,
	/// `tracing` filter directive, e.g. `info` or `jbs=debug`.
	pub log_level: String,
}

impl Default for SessionWidgetsConfig {
	fn default() -> Self {
		Self {
			controls: ControlIds::default(),
			chooser_extensions: vec![".json".into()],
			link_type: LinkType::Preview,
			transition_ms: DEFAULT_TRANSITION_MS,
			revoke_delay_ms: DEFAULT_REVOKE_DELAY_MS,
			focus_delay_ms: DEFAULT_FOCUS_DELAY_MS,
			fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
			artifact_prefix: DEFAULT_ARTIFACT_PREFIX.into(),
			log_level: "info".into(),
		}
	}
}

impl SessionWidgetsConfig {
	/// Checks the invariants serde cannot express.
	///
	/// # Errors
	///
	/// Returns [`ConfigError`] for an empty control id, a blank artifact
	/// prefix or an empty extension list.
	pub fn validate(&self) -> Result<(), ConfigError> {
		for (name, id) in self.controls.entries() {
			if id.trim().is_empty() {
				return Err(ConfigError::EmptyControlId(name));
			}
		}
		if self.artifact_prefix.trim().is_empty() {
			return Err(ConfigError::BlankPrefix);
		}
		if self.chooser_extensions.is_empty() {
			return Err(ConfigError::NoExtensions);
		}
		Ok(())
	}

	pub fn chooser_options(&self) -> ChooserOptions {
		ChooserOptions::single_file(self.link_type, self.chooser_extensions.clone())
	}

	pub fn transition_delay(&self) -> Duration {
		Duration::from_millis(self.transition_ms)
	}

	pub fn revoke_delay(&self) -> Duration {
		Duration::from_millis(self.revoke_delay_ms)
	}

	pub fn focus_delay(&self) -> Duration {
		Duration::from_millis(self.focus_delay_ms)
	}

	pub fn fetch_timeout(&self) -> Option<Duration> {
		(self.fetch_timeout_ms > 0).then(|| Duration::from_millis(self.fetch_timeout_ms))
	}
}
