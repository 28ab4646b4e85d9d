//! DOM-backed implementations of the core seams.

use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use jbs::protocol::{BACKDROP_CLASS, FADE_CLASS, ModalEvent, SessionText};
use jbs::{Document, FileHandle, FileInput, Result, Scheduler, SessionControls, SessionError, TextField};
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, EventInit, File, HtmlButtonElement, HtmlElement, HtmlInputElement, Window};

use crate::error::stringify_js_error;

/// The page document, with `HtmlElement` as node handle.
pub struct WebDocument {
	document: web_sys::Document,
}

impl WebDocument {
	pub fn new(document: web_sys::Document) -> Self {
		Self { document }
	}

	pub fn inner(&self) -> &web_sys::Document {
		&self.document
	}

	/// Looks up an element by id. `None` if absent or not an HTML element.
	pub fn element(&self, id: &str) -> Option<HtmlElement> {
		self.document.get_element_by_id(id)?.dyn_into().ok()
	}
}

fn log_dom_error(op: &'static str, result: std::result::Result<(), JsValue>) {
	if let Err(err) = result {
		warn!(target = "jbs", op, error = %stringify_js_error(err), "DOM operation failed");
	}
}

impl Document for WebDocument {
	type Node = HtmlElement;

	fn create_backdrop(&self) -> Option<HtmlElement> {
		let backdrop: HtmlElement = self.document.create_element("div").ok()?.dyn_into().ok()?;
		backdrop.set_class_name(&format!("{BACKDROP_CLASS} {FADE_CLASS}"));
		self.document.body()?.append_child(&backdrop).ok()?;
		// Reading layout commits the initial opacity so `show` transitions.
		let _ = backdrop.offset_width();
		Some(backdrop)
	}

	fn remove(&self, node: &HtmlElement) {
		node.remove();
	}

	fn add_class(&self, node: &HtmlElement, class: &str) {
		log_dom_error("add_class", node.class_list().add_1(class));
	}

	fn remove_class(&self, node: &HtmlElement, class: &str) {
		log_dom_error("remove_class", node.class_list().remove_1(class));
	}

	fn set_displayed(&self, node: &HtmlElement, displayed: bool) {
		let value = if displayed { "block" } else { "none" };
		log_dom_error("set_displayed", node.style().set_property("display", value));
	}

	fn set_body_class(&self, class: &str, enabled: bool) {
		if let Some(body) = self.document.body() {
			log_dom_error(
				"set_body_class",
				body.class_list().toggle_with_force(class, enabled).map(|_| ()),
			);
		}
	}

	fn ensure_focusable(&self, node: &HtmlElement) {
		if !node.has_attribute("tabindex") {
			log_dom_error("ensure_focusable", node.set_attribute("tabindex", "-1"));
		}
	}

	fn focus(&self, node: &HtmlElement) {
		log_dom_error("focus", node.focus());
	}

	fn dispatch(&self, node: &HtmlElement, event: ModalEvent) {
		let init = EventInit::new();
		init.set_bubbles(true);
		let result = Event::new_with_event_init_dict(event.event_type(), &init)
			.and_then(|event| node.dispatch_event(&event))
			.map(|_| ());
		log_dom_error("dispatch", result);
	}
}

/// `window.setTimeout` scheduler.
pub struct TimeoutScheduler {
	window: Window,
}

impl TimeoutScheduler {
	pub fn new(window: Window) -> Self {
		Self { window }
	}
}

impl Scheduler for TimeoutScheduler {
	fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>) {
		let callback = Closure::once_into_js(move || task());
		let timeout = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
		let result = self
			.window
			.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), timeout)
			.map(|_| ());
		log_dom_error("set_timeout", result);
	}
}

/// The load triggers disabled while a load is in flight.
///
/// Buttons and inputs get the `disabled` property; other elements (the cloud
/// menu item is a `div`) get a `disabled` class and `aria-disabled`.
pub struct WebControls {
	elements: Vec<HtmlElement>,
}

impl WebControls {
	pub fn new(elements: impl IntoIterator<Item = Option<HtmlElement>>) -> Self {
		Self {
			elements: elements.into_iter().flatten().collect(),
		}
	}
}

impl SessionControls for WebControls {
	fn set_busy(&self, busy: bool) {
		for element in &self.elements {
			if let Some(button) = element.dyn_ref::<HtmlButtonElement>() {
				button.set_disabled(busy);
			} else if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
				input.set_disabled(busy);
			} else {
				log_dom_error("set_busy", element.class_list().toggle_with_force("disabled", busy).map(|_| ()));
				log_dom_error(
					"set_busy",
					element.set_attribute("aria-disabled", if busy { "true" } else { "false" }),
				);
			}
		}
	}
}

/// A `File` picked through an `<input type="file">`.
pub struct WebFile {
	file: File,
}

#[async_trait(?Send)]
impl FileHandle for WebFile {
	fn name(&self) -> String {
		self.file.name()
	}

	async fn read_text(&self) -> Result<SessionText> {
		let value = JsFuture::from(self.file.text())
			.await
			.map_err(|err| SessionError::Read(stringify_js_error(err)))?;
		value
			.as_string()
			.ok_or_else(|| SessionError::Read("file content is not text".into()))
	}
}

pub struct WebFileInput {
	input: HtmlInputElement,
}

impl WebFileInput {
	pub fn new(input: HtmlInputElement) -> Self {
		Self { input }
	}
}

impl FileInput for WebFileInput {
	fn selected_file(&self) -> Option<Rc<dyn FileHandle>> {
		let file = self.input.files()?.get(0)?;
		Some(Rc::new(WebFile { file }))
	}

	fn reset(&self) {
		self.input.set_value("");
	}
}

pub struct WebTextField {
	input: HtmlInputElement,
}

impl WebTextField {
	pub fn new(input: HtmlInputElement) -> Self {
		Self { input }
	}
}

impl TextField for WebTextField {
	fn value(&self) -> String {
		self.input.value()
	}

	fn clear(&self) {
		self.input.set_value("");
	}
}
