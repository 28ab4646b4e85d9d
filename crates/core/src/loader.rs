//! Loading raw session text from a local file, a URL or the cloud chooser.

use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use futures::channel::oneshot;
use futures::future::{Either, select};
use jbs_protocol::{ChooserOptions, SessionText};
use tracing::{debug, info, warn};

use crate::chooser::{CloudChooser, choose_single};
use crate::dom::Scheduler;
use crate::engine::{Engine, StringLoader};
use crate::error::{Result, SessionError};

/// A user-supplied file handle (`File` from an `<input type="file">`).
#[async_trait(?Send)]
pub trait FileHandle {
	fn name(&self) -> String;

	/// Reads the whole file as UTF-8 text.
	///
	/// # Errors
	///
	/// Returns [`SessionError::Read`](crate::SessionError::Read) if the file
	/// cannot be read.
	async fn read_text(&self) -> Result<SessionText>;
}

/// Normalizes the three session sources behind one async contract.
///
/// Nothing is cached: every call performs a fresh read or fetch.
pub struct SourceLoader {
	engine: Rc<dyn Engine>,
	fallback: Rc<dyn StringLoader>,
	chooser: Rc<dyn CloudChooser>,
	chooser_options: ChooserOptions,
	fetch_timeout: Option<(Rc<dyn Scheduler>, Duration)>,
}

impl SourceLoader {
	pub fn new(
		engine: Rc<dyn Engine>,
		fallback: Rc<dyn StringLoader>,
		chooser: Rc<dyn CloudChooser>,
		chooser_options: ChooserOptions,
	) -> Self {
		Self {
			engine,
			fallback,
			chooser,
			chooser_options,
			fetch_timeout: None,
		}
	}

	/// Fails URL loads that have not settled after `timeout`. The timer runs
	/// on `scheduler`; the underlying request is not aborted.
	pub fn with_fetch_timeout(mut self, scheduler: Rc<dyn Scheduler>, timeout: Duration) -> Self {
		self.fetch_timeout = Some((scheduler, timeout));
		self
	}

	/// Returns the engine's loader if it currently offers one, else the fallback.
	pub fn select_loader(&self) -> Rc<dyn StringLoader> {
		self.engine
			.preferred_loader()
			.unwrap_or_else(|| Rc::clone(&self.fallback))
	}

	/// Reads a local file.
	///
	/// # Errors
	///
	/// Propagates the handle's read error.
	pub async fn load_from_file(&self, file: &dyn FileHandle) -> Result<SessionText> {
		debug!(target = "jbs", file = %file.name(), "Reading session file");
		file.read_text().await
	}

	/// Fetches `url` with the loader selected for this call. No retry.
	///
	/// # Errors
	///
	/// Propagates the loader's fetch error, or [`SessionError::Fetch`] when
	/// the fetch timeout elapses first.
	pub async fn load_from_url(&self, url: &str) -> Result<SessionText> {
		let loader = self.select_loader();
		debug!(target = "jbs", url, loader = loader.name(), "Fetching session");
		let fetch = loader.load_string(url);

		let Some((scheduler, timeout)) = &self.fetch_timeout else {
			return fetch.await;
		};
		let (expired, timer) = oneshot::channel::<()>();
		scheduler.defer(
			*timeout,
			Box::new(move || {
				let _ = expired.send(());
			}),
		);

		match select(fetch, timer).await {
			Either::Left((result, _)) => result,
			Either::Right((Ok(()), _)) => {
				warn!(target = "jbs", url, loader = loader.name(), "Fetch timed out");
				Err(SessionError::fetch(
					url,
					format!("timed out after {} ms", timeout.as_millis()),
				))
			}
			// Timer dropped without firing; keep waiting on the fetch alone.
			Either::Right((Err(oneshot::Canceled), fetch)) => fetch.await,
		}
	}

	/// Lets the user pick one file with the cloud chooser, then fetches its
	/// link through [`load_from_url`](Self::load_from_url) so preview links
	/// get the same rewriting as typed URLs.
	///
	/// # Errors
	///
	/// See [`choose_single`]; fetch errors propagate as for URLs.
	pub async fn load_from_cloud_picker(&self) -> Result<SessionText> {
		let file = choose_single(self.chooser.as_ref(), &self.chooser_options).await?;
		info!(
			target = "jbs",
			provider = self.chooser.provider(),
			name = file.name.as_deref().unwrap_or("<unnamed>"),
			"Cloud file chosen"
		);
		self.load_from_url(&file.link).await
	}
}
