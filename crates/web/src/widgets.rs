//! Binds the page's session controls to a [`SessionCoordinator`].

use std::rc::Rc;

use js_sys::Function;
use jbs::{CloudChooser, Collaborators, ModalController, Scheduler, SessionCoordinator, SessionWidgetsConfig};
use tracing::{debug, info};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, EventTarget, HtmlElement, HtmlInputElement, KeyboardEvent};

use crate::alert::JsAlert;
use crate::chooser::DropboxChooser;
use crate::dom::{TimeoutScheduler, WebControls, WebDocument, WebFileInput, WebTextField};
use crate::download::BlobDownloader;
use crate::engine::{FetchLoader, HicEngine};
use crate::error::{Result, WebError};
use crate::markup;

type Coordinator = Rc<SessionCoordinator<WebDocument>>;

/// Adds `handler` as a listener for `event`. The listener lives as long as
/// the page.
fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) -> Result<()> {
	let closure = Closure::<dyn FnMut(Event)>::new(handler);
	target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
	closure.forget();
	Ok(())
}

fn absent(control: &'static str, id: &str) {
	debug!(target = "jbs", control, id, "Control not found; not bound");
}

/// Strips Bootstrap's data-api attributes so only our listener handles clicks.
fn detach_from_dropdown(element: &Element) {
	let _ = element.remove_attribute("data-toggle");
	let _ = element.remove_attribute("data-target");
}

fn close_dropdown(element: &Element) {
	let Ok(Some(dropdown)) = element.closest(".dropdown") else {
		return;
	};
	if let Ok(Some(menu)) = dropdown.query_selector(".dropdown-menu") {
		let _ = menu.class_list().remove_1("show");
	}
	let _ = dropdown.class_list().remove_1("show");
}

fn swallow(event: &Event) {
	event.prevent_default();
	event.stop_propagation();
}

/// Everything `configureSessionWidgets` wires up.
pub struct SessionWidgets {
	config: SessionWidgetsConfig,
	window: web_sys::Window,
	document: Rc<WebDocument>,
	container: HtmlElement,
}

impl SessionWidgets {
	pub fn new(container: HtmlElement, config: SessionWidgetsConfig) -> Result<Self> {
		config.validate()?;
		let window = web_sys::window().ok_or(WebError::MissingGlobal("window"))?;
		let document = window.document().ok_or(WebError::MissingGlobal("document"))?;
		Ok(Self {
			config,
			window,
			document: Rc::new(WebDocument::new(document)),
			container,
		})
	}

	/// Inserts the generated markup, builds the coordinator and binds every
	/// control that exists on the page.
	pub fn install(self, hic: JsValue, alert: Option<Function>) -> Result<()> {
		let chooser = Rc::new(DropboxChooser);
		let modal = self.ensure_url_modal()?;
		let menu = self.element(&self.config.controls.dropdown_menu);
		if let Some(menu) = &menu {
			self.ensure_cloud_item(menu, chooser.provider())?;
		}

		let ids = &self.config.controls;
		let file_input = self.input(&ids.file_input);
		let cloud_button = self.element(&ids.cloud_button);
		let url_trigger = menu
			.as_ref()
			.and_then(|menu| menu.query_selector(&ids.url_modal_trigger_selector()).ok().flatten())
			.and_then(|el| el.dyn_into::<HtmlElement>().ok());
		let url_input = self.input(&ids.url_input);
		let url_submit = self.element(&ids.url_submit);
		let save_button = self.element(&ids.save_button);

		let scheduler: Rc<dyn Scheduler> = Rc::new(TimeoutScheduler::new(self.window.clone()));
		let controls = WebControls::new([
			file_input.clone().map(HtmlElement::from),
			cloud_button.clone(),
			url_trigger.clone(),
			url_submit.clone(),
		]);
		let parts = Collaborators {
			engine: Rc::new(HicEngine::new(hic, self.container.clone().into())),
			fallback_loader: Rc::new(FetchLoader::new(self.window.clone())),
			chooser,
			document: Rc::clone(&self.document),
			scheduler: Rc::clone(&scheduler),
			alert: Rc::new(JsAlert::new(alert)),
			sink: Rc::new(BlobDownloader::new(
				self.document.inner().clone(),
				scheduler,
				self.config.revoke_delay(),
			)),
			controls: Rc::new(controls),
		};
		let coordinator = Rc::new(SessionCoordinator::new(parts, &self.config));

		match &modal {
			Some(modal) => bind_modal(coordinator.modal(), modal)?,
			None => absent("urlModal", &ids.url_modal),
		}
		match file_input {
			Some(input) => bind_file_input(&coordinator, input)?,
			None => absent("fileInput", &ids.file_input),
		}
		match cloud_button {
			Some(button) => bind_cloud_button(&coordinator, button)?,
			None => absent("cloudButton", &ids.cloud_button),
		}
		match (url_trigger, &modal) {
			(Some(trigger), Some(modal)) => bind_url_trigger(&coordinator, trigger, modal.clone(), url_input.clone())?,
			_ => absent("urlModalTrigger", &ids.url_modal_trigger_selector()),
		}
		match (url_submit, url_input, &modal) {
			(Some(submit), Some(input), Some(modal)) => bind_url_submit(&coordinator, submit, input, modal.clone())?,
			_ => absent("urlSubmit", &ids.url_submit),
		}
		match save_button {
			Some(button) => bind_save_button(&coordinator, button)?,
			None => absent("saveButton", &ids.save_button),
		}

		info!(target = "jbs", "Session widgets configured");
		Ok(())
	}

	fn element(&self, id: &str) -> Option<HtmlElement> {
		self.document.element(id)
	}

	fn input(&self, id: &str) -> Option<HtmlInputElement> {
		self.element(id)?.dyn_into().ok()
	}

	fn ensure_url_modal(&self) -> Result<Option<HtmlElement>> {
		let id = &self.config.controls.url_modal;
		if let Some(modal) = self.element(id) {
			return Ok(Some(modal));
		}
		let staging = self.document.inner().create_element("div")?;
		staging.set_inner_html(&markup::url_modal_html(&self.config.controls));
		while let Some(child) = staging.first_child() {
			self.container.append_child(&child)?;
		}
		Ok(self.element(id))
	}

	fn ensure_cloud_item(&self, menu: &HtmlElement, provider: &str) -> Result<()> {
		let id = &self.config.controls.cloud_button;
		if self.element(id).is_some() {
			return Ok(());
		}
		let item = self.document.inner().create_element("div")?;
		item.set_class_name("dropdown-item");
		item.set_id(id);
		item.set_inner_html(&markup::cloud_item_inner_html(provider));

		let anchor = menu
			.query_selector(markup::LOCAL_FILE_ITEM_SELECTOR)?
			.and_then(|label| label.next_sibling());
		match anchor {
			Some(next) => menu.insert_before(&item, Some(&next))?,
			None => menu.append_child(&item)?,
		};
		Ok(())
	}
}

fn bind_modal(modal: &ModalController<WebDocument>, element: &HtmlElement) -> Result<()> {
	let closers = element.query_selector_all(markup::CLOSE_SELECTOR)?;
	for i in 0..closers.length() {
		let Some(closer) = closers.get(i) else { continue };
		let (modal, element) = (modal.clone(), element.clone());
		listen(&closer, "click", move |_| modal.close_requested(&element))?;
	}

	let (click_modal, click_element) = (modal.clone(), element.clone());
	listen(element, "click", move |event| {
		if let Some(target) = event.target().and_then(|t| t.dyn_into::<HtmlElement>().ok()) {
			click_modal.handle_click(&click_element, &target);
		}
	})?;

	let (key_modal, key_element) = (modal.clone(), element.clone());
	listen(element, "keydown", move |event| {
		if let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) {
			key_modal.handle_key(&key_element, &key);
		}
	})
}

fn bind_file_input(coordinator: &Coordinator, input: HtmlInputElement) -> Result<()> {
	let coordinator = Rc::clone(coordinator);
	let target = input.clone();
	listen(&target, "change", move |_| {
		let coordinator = Rc::clone(&coordinator);
		let input = WebFileInput::new(input.clone());
		spawn_local(async move {
			coordinator.on_file_selected(&input).await;
		});
	})
}

fn bind_cloud_button(coordinator: &Coordinator, button: HtmlElement) -> Result<()> {
	let coordinator = Rc::clone(coordinator);
	listen(&button, "click", move |event| {
		swallow(&event);
		let coordinator = Rc::clone(&coordinator);
		spawn_local(async move {
			coordinator.on_cloud_requested().await;
		});
	})
}

fn bind_url_trigger(
	coordinator: &Coordinator,
	trigger: HtmlElement,
	modal: HtmlElement,
	url_input: Option<HtmlInputElement>,
) -> Result<()> {
	detach_from_dropdown(&trigger);
	let coordinator = Rc::clone(coordinator);
	let focus = url_input.map(HtmlElement::from);
	let source = trigger.clone();
	listen(&trigger, "click", move |event| {
		swallow(&event);
		close_dropdown(&source);
		coordinator.open_url_modal(Some(&modal), focus.clone());
	})
}

fn bind_url_submit(
	coordinator: &Coordinator,
	submit: HtmlElement,
	input: HtmlInputElement,
	modal: HtmlElement,
) -> Result<()> {
	let coordinator = Rc::clone(coordinator);
	let field = Rc::new(WebTextField::new(input.clone()));
	listen(&submit, "click", move |_| {
		let (coordinator, field, modal) = (Rc::clone(&coordinator), Rc::clone(&field), modal.clone());
		spawn_local(async move {
			coordinator.on_url_submitted(&*field, Some(&modal)).await;
		});
	})?;

	listen(&input, "keypress", move |event| {
		if event.dyn_ref::<KeyboardEvent>().is_some_and(|key| key.key() == "Enter") {
			submit.click();
		}
	})
}

fn bind_save_button(coordinator: &Coordinator, button: HtmlElement) -> Result<()> {
	detach_from_dropdown(&button);
	let coordinator = Rc::clone(coordinator);
	let source = button.clone();
	listen(&button, "click", move |event| {
		swallow(&event);
		close_dropdown(&source);
		coordinator.on_save_requested();
	})
}
