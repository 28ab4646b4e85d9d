//! `Dropbox.choose` bridge.

use js_sys::{Array, Function, Reflect};
use jbs::protocol::{ChooserFile, ChooserOptions};
use jbs::{ChooserCallbacks, CloudChooser, Result, SessionError};
use serde::Serialize;
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::error::stringify_js_error;

const PROVIDER: &str = "Dropbox";

/// The Dropbox Chooser loaded from `dropins.js`.
///
/// The global is looked up on every call; the script may load after the
/// widgets are wired.
#[derive(Debug, Default)]
pub struct DropboxChooser;

impl DropboxChooser {
	fn global() -> Option<(JsValue, Function)> {
		let dropbox = Reflect::get(&js_sys::global(), &JsValue::from_str(PROVIDER)).ok()?;
		if dropbox.is_undefined() || dropbox.is_null() {
			return None;
		}
		let choose = Reflect::get(&dropbox, &JsValue::from_str("choose"))
			.ok()?
			.dyn_into::<Function>()
			.ok()?;
		Some((dropbox, choose))
	}

	fn failure(message: impl Into<String>) -> SessionError {
		SessionError::Chooser {
			provider: PROVIDER,
			message: message.into(),
		}
	}
}

impl CloudChooser for DropboxChooser {
	fn provider(&self) -> &'static str {
		PROVIDER
	}

	fn is_available(&self) -> bool {
		Self::global().is_some()
	}

	fn choose(&self, options: &ChooserOptions, callbacks: ChooserCallbacks) -> Result<()> {
		let (dropbox, choose) = Self::global().ok_or(SessionError::ProviderUnavailable(PROVIDER))?;
		let config = options
			.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
			.map_err(|e| Self::failure(e.to_string()))?;

		let on_success = callbacks.clone();
		let success = Closure::<dyn FnMut(JsValue)>::new(move |files: JsValue| {
			on_success.success(parse_files(&files));
		});
		let cancel = Closure::<dyn FnMut()>::new(move || callbacks.cancel());

		Reflect::set(&config, &JsValue::from_str("success"), success.as_ref())
			.and_then(|_| Reflect::set(&config, &JsValue::from_str("cancel"), cancel.as_ref()))
			.map_err(|e| Self::failure(stringify_js_error(e)))?;
		choose
			.call1(&dropbox, &config)
			.map_err(|e| Self::failure(stringify_js_error(e)))?;

		// The chooser owns the callbacks from here on.
		success.forget();
		cancel.forget();
		Ok(())
	}
}

/// Converts the `success` argument, skipping entries without a usable link.
fn parse_files(files: &JsValue) -> Vec<ChooserFile> {
	if !Array::is_array(files) {
		warn!(target = "jbs", "Chooser success payload is not an array");
		return Vec::new();
	}
	Array::from(files)
		.iter()
		.filter_map(|entry| match serde_wasm_bindgen::from_value::<ChooserFile>(entry) {
			Ok(file) => Some(file),
			Err(err) => {
				warn!(target = "jbs", error = %err, "Skipping malformed chooser entry");
				None
			}
		})
		.collect()
}
