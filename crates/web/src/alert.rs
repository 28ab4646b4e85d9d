use js_sys::Function;
use jbs::AlertChannel;
use tracing::warn;
use wasm_bindgen::JsValue;

use crate::error::stringify_js_error;

/// Alert channel backed by a page-supplied function (`AlertSingleton.present`),
/// or `window.alert` when none was given.
pub struct JsAlert {
	present: Option<Function>,
}

impl JsAlert {
	pub fn new(present: Option<Function>) -> Self {
		Self { present }
	}
}

impl AlertChannel for JsAlert {
	fn present(&self, message: &str) {
		let result = match &self.present {
			Some(present) => present.call1(&JsValue::NULL, &JsValue::from_str(message)).map(|_| ()),
			None => match web_sys::window() {
				Some(window) => window.alert_with_message(message),
				None => Err(JsValue::from_str("no window")),
			},
		};
		if let Err(err) = result {
			warn!(target = "jbs", message, error = %stringify_js_error(err), "Alert could not be shown");
		}
	}
}
