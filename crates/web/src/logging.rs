use std::io;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;

/// Installs a `tracing` subscriber that prints to the browser console.
///
/// `directive` is an `EnvFilter` directive such as `info` or `jbs=debug`.
/// Calling this again after a subscriber is installed is a no-op.
pub fn init_logging(directive: &str) {
	let env_filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(ConsoleMakeWriter)
		.with_target(true)
		.with_level(true)
		.with_ansi(false)
		.without_time()
		.compact()
		.try_init();
}

struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
	type Writer = ConsoleWriter;

	fn make_writer(&'a self) -> Self::Writer {
		ConsoleWriter(Vec::with_capacity(128))
	}
}

/// Buffers one formatted event and emits it as a single `console.log` line.
struct ConsoleWriter(Vec<u8>);

impl io::Write for ConsoleWriter {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.0.extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

impl Drop for ConsoleWriter {
	fn drop(&mut self) {
		if self.0.is_empty() {
			return;
		}
		let line = String::from_utf8_lossy(&self.0);
		web_sys::console::log_1(&JsValue::from_str(line.trim_end()));
	}
}
