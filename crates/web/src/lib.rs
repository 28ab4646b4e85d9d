//! Browser bindings for the juicebox session widgets.
//!
//! Implements the `jbs` seams over wasm-bindgen: the page DOM, the `hic`
//! engine global, `window.fetch`, `Dropbox.choose` and `Blob` downloads.
//! The page calls [`configure_session_widgets`] once after the engine is
//! created.

pub mod alert;
pub mod chooser;
pub mod dom;
pub mod download;
pub mod engine;
pub mod error;
pub mod logging;
pub mod markup;
pub mod widgets;

use js_sys::{Function, Reflect};
use jbs::SessionWidgetsConfig;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

pub use error::{WebError, stringify_js_error};
pub use logging::init_logging;
pub use widgets::SessionWidgets;

#[wasm_bindgen(start)]
pub fn start() {
	console_error_panic_hook::set_once();
}

fn option(options: &JsValue, name: &str) -> Option<JsValue> {
	if !options.is_object() {
		return None;
	}
	Reflect::get(options, &JsValue::from_str(name))
		.ok()
		.filter(|value| !value.is_undefined() && !value.is_null())
}

/// Wires the session dropdown, the URL modal and the save button.
///
/// `options` is an optional object holding [`SessionWidgetsConfig`] fields
/// plus two non-serializable entries: `hic` (the engine module, defaults to
/// the `hic` global) and `alert` (a `present(message)` function, defaults to
/// `window.alert`).
#[wasm_bindgen(js_name = configureSessionWidgets)]
pub fn configure_session_widgets(container: HtmlElement, options: JsValue) -> Result<(), JsValue> {
	let config: SessionWidgetsConfig = if options.is_undefined() || options.is_null() {
		SessionWidgetsConfig::default()
	} else {
		serde_wasm_bindgen::from_value(options.clone()).map_err(|e| WebError::Options(e.to_string()))?
	};
	init_logging(&config.log_level);

	let hic = option(&options, "hic")
		.or_else(|| option(&JsValue::from(js_sys::global()), "hic"))
		.ok_or(WebError::MissingGlobal("hic"))?;
	let alert = option(&options, "alert").and_then(|f| f.dyn_into::<Function>().ok());

	SessionWidgets::new(container, config)?.install(hic, alert)?;
	Ok(())
}
