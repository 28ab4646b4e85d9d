//! The `hic` engine global and the two URL loaders available on the page.

use std::rc::Rc;

use async_trait::async_trait;
use js_sys::{Function, JSON, Promise, Reflect};
use jbs::protocol::{SessionObject, SessionText};
use jbs::{Engine, EngineError, Result, SessionError, StringLoader};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Response, Window};

use crate::error::stringify_js_error;

fn property(target: &JsValue, name: &str) -> Option<JsValue> {
	Reflect::get(target, &JsValue::from_str(name))
		.ok()
		.filter(|value| !value.is_undefined() && !value.is_null())
}

fn method(target: &JsValue, name: &str) -> Option<Function> {
	property(target, name)?.dyn_into().ok()
}

/// Awaits `value` whether or not the callee returned a promise.
async fn settle(value: JsValue) -> std::result::Result<JsValue, JsValue> {
	JsFuture::from(Promise::resolve(&value)).await
}

/// Engine adapter over the `hic` module object, bound to one container.
pub struct HicEngine {
	hic: JsValue,
	container: JsValue,
}

impl HicEngine {
	pub fn new(hic: JsValue, container: JsValue) -> Self {
		Self { hic, container }
	}
}

#[async_trait(?Send)]
impl Engine for HicEngine {
	async fn restore(&self, session: SessionObject) -> std::result::Result<(), EngineError> {
		let restore = method(&self.hic, "restoreSession")
			.ok_or_else(|| EngineError::new("hic.restoreSession is not a function"))?;
		let payload = session
			.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
			.map_err(|e| EngineError::new(e.to_string()))?;
		let returned = restore
			.call2(&self.hic, &self.container, &payload)
			.map_err(|e| EngineError::new(stringify_js_error(e)))?;
		settle(returned)
			.await
			.map_err(|e| EngineError::new(stringify_js_error(e)))?;
		Ok(())
	}

	fn serialize(&self) -> std::result::Result<SessionObject, EngineError> {
		let to_json =
			method(&self.hic, "toJSON").ok_or_else(|| EngineError::new("hic.toJSON is not a function"))?;
		let state = to_json
			.call0(&self.hic)
			.map_err(|e| EngineError::new(stringify_js_error(e)))?;
		// Round-trip through JSON text so engine-side `toJSON` hooks apply.
		let text = JSON::stringify(&state)
			.map_err(|e| EngineError::new(stringify_js_error(e)))?
			.as_string()
			.ok_or_else(|| EngineError::new("engine state is not serializable"))?;
		serde_json::from_str(&text).map_err(|e| EngineError::new(format!("engine state is not an object: {e}")))
	}

	fn preferred_loader(&self) -> Option<Rc<dyn StringLoader>> {
		let igvxhr = property(&self.hic, "igvxhr")?;
		let load_string = method(&igvxhr, "loadString")?;
		Some(Rc::new(EngineStringLoader { igvxhr, load_string }))
	}
}

/// `hic.igvxhr.loadString`, which rewrites Dropbox preview links.
pub struct EngineStringLoader {
	igvxhr: JsValue,
	load_string: Function,
}

#[async_trait(?Send)]
impl StringLoader for EngineStringLoader {
	fn name(&self) -> &'static str {
		"igvxhr"
	}

	async fn load_string(&self, url: &str) -> Result<SessionText> {
		let returned = self
			.load_string
			.call1(&self.igvxhr, &JsValue::from_str(url))
			.map_err(|e| SessionError::fetch(url, stringify_js_error(e)))?;
		let body = settle(returned)
			.await
			.map_err(|e| SessionError::fetch(url, stringify_js_error(e)))?;
		body.as_string()
			.ok_or_else(|| SessionError::fetch(url, "response body is not text"))
	}
}

/// Plain `window.fetch`; any non-2xx status is an error.
pub struct FetchLoader {
	window: Window,
}

impl FetchLoader {
	pub fn new(window: Window) -> Self {
		Self { window }
	}
}

#[async_trait(?Send)]
impl StringLoader for FetchLoader {
	fn name(&self) -> &'static str {
		"fetch"
	}

	async fn load_string(&self, url: &str) -> Result<SessionText> {
		let response: Response = JsFuture::from(self.window.fetch_with_str(url))
			.await
			.and_then(|value| value.dyn_into())
			.map_err(|e| SessionError::fetch(url, stringify_js_error(e)))?;
		if !response.ok() {
			return Err(SessionError::fetch(
				url,
				format!("HTTP {} {}", response.status(), response.status_text()),
			));
		}
		let text = response
			.text()
			.map_err(|e| SessionError::fetch(url, stringify_js_error(e)))?;
		JsFuture::from(text)
			.await
			.map_err(|e| SessionError::fetch(url, stringify_js_error(e)))?
			.as_string()
			.ok_or_else(|| SessionError::fetch(url, "response body is not text"))
	}
}
