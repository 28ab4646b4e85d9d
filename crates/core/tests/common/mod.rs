//! In-memory page doubles for driving the coordinator without a browser.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use jbs::protocol::{ChooserFile, ChooserOptions, ModalEvent, SessionArtifact, SessionObject, SessionText};
use jbs::{
	AlertChannel, ArtifactSink, ChooserCallbacks, CloudChooser, Collaborators, Document, Engine, EngineError,
	FileHandle, FileInput, Result, Scheduler, SessionControls, SessionCoordinator, SessionError,
	SessionWidgetsConfig, StringLoader, TextField,
};

pub type NodeId = u32;

#[derive(Debug, Default, Clone)]
pub struct Element {
	pub classes: BTreeSet<String>,
	pub displayed: Option<bool>,
	pub tabindex: bool,
	pub attached: bool,
	pub backdrop: bool,
}

#[derive(Default)]
pub struct FakeDom {
	next_id: Cell<NodeId>,
	pub elements: RefCell<BTreeMap<NodeId, Element>>,
	pub body_classes: RefCell<BTreeSet<String>>,
	pub focused: Cell<Option<NodeId>>,
	pub events: RefCell<Vec<(NodeId, ModalEvent)>>,
	/// Every mutation applied to a backdrop element, in order.
	pub backdrop_ops: RefCell<Vec<String>>,
}

impl FakeDom {
	pub fn element(&self) -> NodeId {
		let id = self.next_id.get() + 1;
		self.next_id.set(id);
		self.elements.borrow_mut().insert(
			id,
			Element {
				attached: true,
				..Default::default()
			},
		);
		id
	}

	pub fn attached_backdrops(&self) -> usize {
		self.elements
			.borrow()
			.values()
			.filter(|e| e.backdrop && e.attached)
			.count()
	}

	pub fn has_class(&self, node: NodeId, class: &str) -> bool {
		self.elements.borrow()[&node].classes.contains(class)
	}

	pub fn events_for(&self, node: NodeId) -> Vec<ModalEvent> {
		self.events
			.borrow()
			.iter()
			.filter(|(n, _)| *n == node)
			.map(|(_, e)| *e)
			.collect()
	}

	fn note(&self, node: NodeId, op: String) {
		if self.elements.borrow()[&node].backdrop {
			self.backdrop_ops.borrow_mut().push(op);
		}
	}
}

impl Document for FakeDom {
	type Node = NodeId;

	fn create_backdrop(&self) -> Option<NodeId> {
		let id = self.element();
		let mut elements = self.elements.borrow_mut();
		let el = elements.get_mut(&id).unwrap();
		el.backdrop = true;
		el.classes.insert("modal-backdrop".into());
		el.classes.insert("fade".into());
		drop(elements);
		self.backdrop_ops.borrow_mut().push("create".into());
		Some(id)
	}

	fn remove(&self, node: &NodeId) {
		self.note(*node, "remove".into());
		self.elements.borrow_mut().get_mut(node).unwrap().attached = false;
	}

	fn add_class(&self, node: &NodeId, class: &str) {
		self.note(*node, format!("+{class}"));
		self.elements.borrow_mut().get_mut(node).unwrap().classes.insert(class.into());
	}

	fn remove_class(&self, node: &NodeId, class: &str) {
		self.note(*node, format!("-{class}"));
		self.elements.borrow_mut().get_mut(node).unwrap().classes.remove(class);
	}

	fn set_displayed(&self, node: &NodeId, displayed: bool) {
		self.elements.borrow_mut().get_mut(node).unwrap().displayed = Some(displayed);
	}

	fn set_body_class(&self, class: &str, enabled: bool) {
		let mut body = self.body_classes.borrow_mut();
		if enabled {
			body.insert(class.into());
		} else {
			body.remove(class);
		}
	}

	fn ensure_focusable(&self, node: &NodeId) {
		self.elements.borrow_mut().get_mut(node).unwrap().tabindex = true;
	}

	fn focus(&self, node: &NodeId) {
		self.focused.set(Some(*node));
	}

	fn dispatch(&self, node: &NodeId, event: ModalEvent) {
		self.events.borrow_mut().push((*node, event));
	}
}

/// Collects deferred tasks; tests decide when time passes.
#[derive(Default)]
pub struct ManualScheduler {
	tasks: RefCell<Vec<(Duration, Box<dyn FnOnce()>)>>,
}

impl ManualScheduler {
	pub fn pending(&self) -> usize {
		self.tasks.borrow().len()
	}

	pub fn delays(&self) -> Vec<Duration> {
		self.tasks.borrow().iter().map(|(d, _)| *d).collect()
	}

	/// Runs every task queued so far, in order.
	pub fn run_all(&self) {
		let tasks: Vec<_> = self.tasks.borrow_mut().drain(..).collect();
		for (_, task) in tasks {
			task();
		}
	}
}

impl Scheduler for ManualScheduler {
	fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>) {
		self.tasks.borrow_mut().push((delay, task));
	}
}

/// Engine double recording restores and serving a fixed snapshot.
#[derive(Default)]
pub struct FakeEngine {
	pub restored: RefCell<Vec<SessionObject>>,
	pub snapshot: RefCell<Option<SessionObject>>,
	pub restore_error: RefCell<Option<String>>,
	pub preferred: RefCell<Option<Rc<dyn StringLoader>>>,
	pub busy_seen: RefCell<Vec<bool>>,
	pub busy_probe: RefCell<Option<Rc<Cell<bool>>>>,
}

#[async_trait(?Send)]
impl Engine for FakeEngine {
	async fn restore(&self, session: SessionObject) -> std::result::Result<(), EngineError> {
		if let Some(probe) = self.busy_probe.borrow().as_ref() {
			self.busy_seen.borrow_mut().push(probe.get());
		}
		if let Some(message) = self.restore_error.borrow().clone() {
			return Err(EngineError::new(message));
		}
		self.restored.borrow_mut().push(session);
		Ok(())
	}

	fn serialize(&self) -> std::result::Result<SessionObject, EngineError> {
		self.snapshot
			.borrow()
			.clone()
			.ok_or_else(|| EngineError::new("browser not initialized"))
	}

	fn preferred_loader(&self) -> Option<Rc<dyn StringLoader>> {
		self.preferred.borrow().clone()
	}
}

/// URL loader double serving canned bodies.
pub struct FakeLoader {
	pub name: &'static str,
	pub bodies: RefCell<BTreeMap<String, std::result::Result<String, String>>>,
	pub requests: RefCell<Vec<String>>,
}

impl FakeLoader {
	pub fn new(name: &'static str) -> Rc<Self> {
		Rc::new(Self {
			name,
			bodies: RefCell::new(BTreeMap::new()),
			requests: RefCell::new(Vec::new()),
		})
	}

	pub fn serve(&self, url: &str, body: &str) {
		self.bodies.borrow_mut().insert(url.into(), Ok(body.into()));
	}

	pub fn fail(&self, url: &str, message: &str) {
		self.bodies.borrow_mut().insert(url.into(), Err(message.into()));
	}
}

#[async_trait(?Send)]
impl StringLoader for FakeLoader {
	fn name(&self) -> &'static str {
		self.name
	}

	async fn load_string(&self, url: &str) -> Result<SessionText> {
		self.requests.borrow_mut().push(url.into());
		match self.bodies.borrow().get(url) {
			Some(Ok(body)) => Ok(body.clone()),
			Some(Err(message)) => Err(SessionError::fetch(url, message.clone())),
			None => Err(SessionError::fetch(url, "HTTP 404 Not Found")),
		}
	}
}

/// What the fake chooser does when opened.
#[derive(Clone)]
pub enum ChooserScript {
	Select(Vec<ChooserFile>),
	Cancel,
	/// Calls `cancel` and then `success`, as a misbehaving widget might.
	CancelThenSelect(Vec<ChooserFile>),
}

pub struct FakeChooser {
	pub available: Cell<bool>,
	pub script: RefCell<ChooserScript>,
	pub opened_with: RefCell<Vec<ChooserOptions>>,
}

impl Default for FakeChooser {
	fn default() -> Self {
		Self {
			available: Cell::new(true),
			script: RefCell::new(ChooserScript::Cancel),
			opened_with: RefCell::new(Vec::new()),
		}
	}
}

impl CloudChooser for FakeChooser {
	fn provider(&self) -> &'static str {
		"Dropbox"
	}

	fn is_available(&self) -> bool {
		self.available.get()
	}

	fn choose(&self, options: &ChooserOptions, callbacks: ChooserCallbacks) -> Result<()> {
		self.opened_with.borrow_mut().push(options.clone());
		match self.script.borrow().clone() {
			ChooserScript::Select(files) => callbacks.success(files),
			ChooserScript::Cancel => callbacks.cancel(),
			ChooserScript::CancelThenSelect(files) => {
				callbacks.cancel();
				callbacks.success(files);
			}
		}
		Ok(())
	}
}

#[derive(Default)]
pub struct AlertLog(pub RefCell<Vec<String>>);

impl AlertChannel for AlertLog {
	fn present(&self, message: &str) {
		self.0.borrow_mut().push(message.into());
	}
}

impl AlertLog {
	pub fn messages(&self) -> Vec<String> {
		self.0.borrow().clone()
	}
}

#[derive(Default)]
pub struct DownloadLog {
	pub artifacts: RefCell<Vec<SessionArtifact>>,
	pub fail_with: RefCell<Option<String>>,
}

impl ArtifactSink for DownloadLog {
	fn deliver(&self, artifact: &SessionArtifact) -> Result<()> {
		if let Some(message) = self.fail_with.borrow().clone() {
			return Err(SessionError::Save(message));
		}
		self.artifacts.borrow_mut().push(artifact.clone());
		Ok(())
	}
}

/// Records busy toggles and mirrors the current state for probes.
#[derive(Default)]
pub struct ControlsLog {
	pub toggles: RefCell<Vec<bool>>,
	pub current: Rc<Cell<bool>>,
}

impl SessionControls for ControlsLog {
	fn set_busy(&self, busy: bool) {
		self.toggles.borrow_mut().push(busy);
		self.current.set(busy);
	}
}

pub struct FakeFile {
	pub name: String,
	pub contents: std::result::Result<String, String>,
}

#[async_trait(?Send)]
impl FileHandle for FakeFile {
	fn name(&self) -> String {
		self.name.clone()
	}

	async fn read_text(&self) -> Result<SessionText> {
		self.contents.clone().map_err(SessionError::Read)
	}
}

#[derive(Default)]
pub struct FakeFileInput {
	pub file: RefCell<Option<Rc<dyn FileHandle>>>,
	pub value: RefCell<String>,
}

impl FakeFileInput {
	pub fn with_file(name: &str, contents: &str) -> Self {
		Self {
			file: RefCell::new(Some(Rc::new(FakeFile {
				name: name.into(),
				contents: Ok(contents.into()),
			}))),
			value: RefCell::new(format!("C:\\fakepath\\{name}")),
		}
	}
}

impl FileInput for FakeFileInput {
	fn selected_file(&self) -> Option<Rc<dyn FileHandle>> {
		self.file.borrow().clone()
	}

	fn reset(&self) {
		self.value.borrow_mut().clear();
		self.file.borrow_mut().take();
	}
}

#[derive(Default)]
pub struct FakeField(pub RefCell<String>);

impl FakeField {
	pub fn with(value: &str) -> Self {
		Self(RefCell::new(value.into()))
	}

	pub fn value_now(&self) -> String {
		self.0.borrow().clone()
	}
}

impl TextField for FakeField {
	fn value(&self) -> String {
		self.0.borrow().clone()
	}

	fn clear(&self) {
		self.0.borrow_mut().clear();
	}
}

/// A coordinator wired to fresh doubles.
pub struct Page {
	pub coordinator: SessionCoordinator<FakeDom>,
	pub dom: Rc<FakeDom>,
	pub scheduler: Rc<ManualScheduler>,
	pub engine: Rc<FakeEngine>,
	pub fetch: Rc<FakeLoader>,
	pub chooser: Rc<FakeChooser>,
	pub alerts: Rc<AlertLog>,
	pub downloads: Rc<DownloadLog>,
	pub controls: Rc<ControlsLog>,
}

impl Page {
	pub fn new() -> Self {
		Self::with_config(&SessionWidgetsConfig::default())
	}

	pub fn with_config(config: &SessionWidgetsConfig) -> Self {
		let dom = Rc::new(FakeDom::default());
		let scheduler = Rc::new(ManualScheduler::default());
		let engine = Rc::new(FakeEngine::default());
		let fetch = FakeLoader::new("fetch");
		let chooser = Rc::new(FakeChooser::default());
		let alerts = Rc::new(AlertLog::default());
		let downloads = Rc::new(DownloadLog::default());
		let controls = Rc::new(ControlsLog::default());

		let coordinator = SessionCoordinator::new(
			Collaborators {
				engine: engine.clone(),
				fallback_loader: fetch.clone(),
				chooser: chooser.clone(),
				document: Rc::clone(&dom),
				scheduler: scheduler.clone(),
				alert: alerts.clone(),
				sink: downloads.clone(),
				controls: controls.clone(),
			},
			config,
		);

		Self {
			coordinator,
			dom,
			scheduler,
			engine,
			fetch,
			chooser,
			alerts,
			downloads,
			controls,
		}
	}
}
