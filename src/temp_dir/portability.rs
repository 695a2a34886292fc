use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::temp_dir::template::LEGACY_PLACEHOLDER;

static PROCESS_WARNING: OnceLock<Arc<PortabilityWarning>> = OnceLock::new();

pub const PORTABILITY_WARNING: &str = "mkdtemp() templates ending with X are not portable";

/// Where one-off warnings are reported. Warnings never travel through the
/// error value of a call.
pub trait DiagnosticSink: Send + Sync {
	fn warn(&self, message: &str);
}

/// Production sink, reports through `tracing`.
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
	fn warn(&self, message: &str) {
		tracing::warn!(target: "mkdtemp", "{message}");
	}
}

/// Sink that keeps every warning, for tests and embedding hosts that surface
/// warnings themselves.
#[derive(Default)]
pub struct RecordingSink {
	messages: Mutex<Vec<String>>,
}

impl RecordingSink {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn messages(&self) -> Vec<String> {
		self.messages
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	pub fn count(&self, message: &str) -> usize {
		self.messages
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.iter()
			.filter(|m| *m == message)
			.count()
	}
}

impl DiagnosticSink for RecordingSink {
	fn warn(&self, message: &str) {
		self.messages
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.push(message.to_string());
	}
}

/// Tracks whether the trailing `X` warning has been emitted.
///
/// Makers built without an explicit instance all use [`process_warning`].
/// Inject a separate instance to isolate a maker from that shared state.
pub struct PortabilityWarning {
	warned: AtomicBool,
	sink: Arc<dyn DiagnosticSink>,
}

impl PortabilityWarning {
	pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
		PortabilityWarning {
			warned: AtomicBool::new(false),
			sink,
		}
	}

	pub fn with_tracing() -> Self {
		Self::new(Arc::new(TracingSink))
	}

	/// Emit the warning if `template` ends with the legacy placeholder and no
	/// warning was emitted before. Returns whether this call emitted it.
	pub fn check(&self, template: &[u8]) -> bool {
		if template.last() != Some(&LEGACY_PLACEHOLDER) {
			return false;
		}
		if self
			.warned
			.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
			.is_err()
		{
			return false;
		}
		self.sink.warn(PORTABILITY_WARNING);
		true
	}

	pub fn has_warned(&self) -> bool {
		self.warned.load(Ordering::Acquire)
	}

	/// Allow the warning to fire again.
	pub fn reset(&self) {
		self.warned.store(false, Ordering::Release);
	}
}

/// Warning state shared by every maker that was not given its own, so the
/// warning fires at most once per process.
pub fn process_warning() -> Arc<PortabilityWarning> {
	Arc::clone(PROCESS_WARNING.get_or_init(|| Arc::new(PortabilityWarning::with_tracing())))
}

impl Default for PortabilityWarning {
	fn default() -> Self {
		Self::with_tracing()
	}
}
