use std::rc::Rc;
use std::time::Duration;

use js_sys::Array;
use jbs::protocol::SessionArtifact;
use jbs::{ArtifactSink, Result, Scheduler, SessionError};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::error::stringify_js_error;

/// Delivers artifacts through a `Blob` object URL and a temporary anchor.
pub struct BlobDownloader {
	document: web_sys::Document,
	scheduler: Rc<dyn Scheduler>,
	revoke_delay: Duration,
}

impl BlobDownloader {
	pub fn new(document: web_sys::Document, scheduler: Rc<dyn Scheduler>, revoke_delay: Duration) -> Self {
		Self {
			document,
			scheduler,
			revoke_delay,
		}
	}

	fn click_anchor(&self, href: &str, filename: &str) -> std::result::Result<(), JsValue> {
		let anchor: HtmlAnchorElement = self.document.create_element("a")?.dyn_into()?;
		anchor.set_href(href);
		anchor.set_download(filename);
		let body = self
			.document
			.body()
			.ok_or_else(|| JsValue::from_str("document has no body"))?;
		body.append_child(&anchor)?;
		anchor.click();
		anchor.remove();
		Ok(())
	}
}

fn revoke(url: &str) {
	if let Err(err) = Url::revoke_object_url(url) {
		warn!(target = "jbs", error = %stringify_js_error(err), "Failed to revoke object URL");
	}
}

impl ArtifactSink for BlobDownloader {
	fn deliver(&self, artifact: &SessionArtifact) -> Result<()> {
		let save_error = |err: JsValue| SessionError::Save(format!("failed to save session: {}", stringify_js_error(err)));

		let parts = Array::of1(&JsValue::from_str(&artifact.text));
		let props = BlobPropertyBag::new();
		props.set_type(artifact.mime);
		let blob = Blob::new_with_str_sequence_and_options(&parts, &props).map_err(save_error)?;
		let url = Url::create_object_url_with_blob(&blob).map_err(save_error)?;

		if let Err(err) = self.click_anchor(&url, &artifact.filename) {
			revoke(&url);
			return Err(save_error(err));
		}

		debug!(target = "jbs", filename = %artifact.filename, "Download started");
		self.scheduler.defer(self.revoke_delay, Box::new(move || revoke(&url)));
		Ok(())
	}
}
