//! Errors raised while wiring the widgets to the page.

use jbs::ConfigError;
use thiserror::Error;
use wasm_bindgen::JsValue;

pub type Result<T> = std::result::Result<T, WebError>;

#[derive(Debug, Error)]
pub enum WebError {
	#[error("{0} is not available")]
	MissingGlobal(&'static str),

	#[error("invalid options: {0}")]
	Options(String),

	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error("{0}")]
	Js(String),
}

impl From<JsValue> for WebError {
	fn from(err: JsValue) -> Self {
		Self::Js(stringify_js_error(err))
	}
}

impl From<WebError> for JsValue {
	fn from(err: WebError) -> Self {
		js_sys::Error::new(&err.to_string()).into()
	}
}

/// Best-effort human-readable text for a thrown JS value.
pub fn stringify_js_error(err: JsValue) -> String {
	if let Some(error) = wasm_bindgen::JsCast::dyn_ref::<js_sys::Error>(&err) {
		return String::from(error.message());
	}
	err.as_string()
		.or_else(|| js_sys::JSON::stringify(&err).ok()?.as_string())
		.unwrap_or_else(|| format!("{err:?}"))
}
