use crossbeam::channel::{Receiver, bounded};
use rand::Rng;
use snafu::ensure;
use std::io;
use std::sync::{Arc, OnceLock};

use crate::temp_dir::created_path::{CreatedPath, Encoding};
use crate::temp_dir::dir_creator::{DEFAULT_DIR_MODE, DirCreator, RealDirCreator};
use crate::temp_dir::error::{
	InvalidNameSnafu, InvalidTemplateSnafu, MkdtempError, RetryExhaustedSnafu,
};
use crate::temp_dir::os_error::MkdirFailure;
use crate::temp_dir::portability::{PortabilityWarning, process_warning};
use crate::temp_dir::suffix::{SUFFIX_LEN, generate_suffix};
use crate::temp_dir::template::{Template, bytes_to_path};
use crate::temp_dir::worker_pool::WorkerPool;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;
pub const DEFAULT_WORKER_THREADS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MakerConfig {
	/// Candidate names tried before giving up with `RetryExhausted`
	pub max_attempts: u32,
	/// Threads serving `create_async` and `create_task`
	pub worker_threads: usize,
	/// Permission bits for new directories (Unix only)
	pub dir_mode: u32,
}

impl Default for MakerConfig {
	fn default() -> Self {
		MakerConfig {
			max_attempts: DEFAULT_MAX_ATTEMPTS,
			worker_threads: DEFAULT_WORKER_THREADS,
			dir_mode: DEFAULT_DIR_MODE,
		}
	}
}

/// Per-call options. `MkdtempOptions::default()` behaves exactly like passing
/// no options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MkdtempOptions {
	/// Representation of the returned path. When unset the path is UTF-8 text,
	/// or raw bytes if it is not valid UTF-8.
	pub encoding: Option<Encoding>,
}

impl MkdtempOptions {
	pub fn with_encoding(encoding: Encoding) -> Self {
		MkdtempOptions {
			encoding: Some(encoding),
		}
	}
}

struct MakerCore {
	max_attempts: u32,
	warning: Arc<PortabilityWarning>,
	creator: Arc<dyn DirCreator>,
}

impl MakerCore {
	fn create<R: Rng>(
		&self,
		template: &Template,
		options: Option<MkdtempOptions>,
		rng: &mut R,
	) -> Result<CreatedPath, MkdtempError> {
		let prefix = template.as_bytes();
		ensure!(
			!prefix.is_empty(),
			InvalidTemplateSnafu {
				reason: "template must not be empty",
			}
		);
		ensure!(
			!prefix.contains(&0),
			InvalidNameSnafu {
				path: bytes_to_path(prefix),
				reason: "template contains a NUL byte",
				os_error: None::<io::Error>,
			}
		);

		self.warning.check(prefix);

		let encoding = options.unwrap_or_default().encoding;
		let mut candidate = Vec::with_capacity(prefix.len() + SUFFIX_LEN);
		for attempt in 1..=self.max_attempts {
			candidate.clear();
			candidate.extend_from_slice(prefix);
			candidate.extend_from_slice(&generate_suffix(rng));

			let path = bytes_to_path(&candidate);
			match self.creator.create_dir(&path) {
				Ok(()) => {
					tracing::debug!(path = %path.display(), attempt, "created temporary directory");
					return Ok(CreatedPath::encode(candidate, encoding));
				}
				Err(e) => match MkdirFailure::classify(&e) {
					MkdirFailure::AlreadyExists => {
						tracing::debug!(path = %path.display(), attempt, "name already taken, retrying");
					}
					failure => return Err(failure.into_error(path, e)),
				},
			}
		}

		RetryExhaustedSnafu {
			template: bytes_to_path(prefix),
			attempts: self.max_attempts,
		}
		.fail()
	}
}

/// Creates uniquely named directories from path templates.
///
/// Cloning is cheap: clones share the configuration, the warning state and
/// the worker pool.
#[derive(Clone)]
pub struct TempDirMaker {
	core: Arc<MakerCore>,
	worker_threads: usize,
	pool: Arc<OnceLock<WorkerPool>>,
}

impl TempDirMaker {
	/// Maker with default configuration. Warnings go through the process-wide
	/// warning state and are reported via `tracing`.
	pub fn new() -> Self {
		Self::with_config(MakerConfig::default())
	}

	pub fn with_config(config: MakerConfig) -> Self {
		Self::builder().config(config).build()
	}

	pub fn builder() -> TempDirMakerBuilder {
		TempDirMakerBuilder::default()
	}

	/// Shared state of the trailing `X` warning.
	pub fn portability_warning(&self) -> &Arc<PortabilityWarning> {
		&self.core.warning
	}

	/// Create a new directory, blocking until it exists or creation failed.
	pub fn create(
		&self,
		template: impl Into<Template>,
		options: Option<MkdtempOptions>,
	) -> Result<CreatedPath, MkdtempError> {
		self.core.create(&template.into(), options, &mut rand::rng())
	}

	/// Like [`TempDirMaker::create`] with a caller supplied random source.
	pub fn create_with_rng<R: Rng>(
		&self,
		template: impl Into<Template>,
		options: Option<MkdtempOptions>,
		rng: &mut R,
	) -> Result<CreatedPath, MkdtempError> {
		self.core.create(&template.into(), options, rng)
	}

	/// Queue the creation on the worker pool. The returned receiver yields
	/// exactly one result.
	pub fn create_task(
		&self,
		template: impl Into<Template>,
		options: Option<MkdtempOptions>,
	) -> Receiver<Result<CreatedPath, MkdtempError>> {
		let (tx, rx) = bounded(1);
		self.dispatch(template.into(), options, move |result| {
			// the caller may have dropped the receiver, the directory stays
			let _ = tx.send(result);
		});
		rx
	}

	/// Queue the creation on the worker pool and pass the result to
	/// `callback`, which runs exactly once on a worker thread.
	pub fn create_async<F>(
		&self,
		template: impl Into<Template>,
		options: Option<MkdtempOptions>,
		callback: F,
	) where
		F: FnOnce(Result<CreatedPath, MkdtempError>) + Send + 'static,
	{
		self.dispatch(template.into(), options, callback);
	}

	fn dispatch<F>(&self, template: Template, options: Option<MkdtempOptions>, on_done: F)
	where
		F: FnOnce(Result<CreatedPath, MkdtempError>) + Send + 'static,
	{
		let core = Arc::clone(&self.core);
		self.pool().execute(Box::new(move || {
			on_done(core.create(&template, options, &mut rand::rng()));
		}));
	}

	fn pool(&self) -> &WorkerPool {
		self.pool.get_or_init(|| {
			let pool = WorkerPool::new(self.worker_threads);
			tracing::debug!(workers = pool.workers(), "started mkdtemp worker pool");
			pool
		})
	}
}

impl Default for TempDirMaker {
	fn default() -> Self {
		Self::new()
	}
}

#[derive(Default)]
pub struct TempDirMakerBuilder {
	config: MakerConfig,
	warning: Option<Arc<PortabilityWarning>>,
	creator: Option<Arc<dyn DirCreator>>,
}

impl TempDirMakerBuilder {
	pub fn config(mut self, config: MakerConfig) -> Self {
		self.config = config;
		self
	}

	pub fn max_attempts(mut self, max_attempts: u32) -> Self {
		self.config.max_attempts = max_attempts;
		self
	}

	pub fn worker_threads(mut self, worker_threads: usize) -> Self {
		self.config.worker_threads = worker_threads;
		self
	}

	/// Use an existing warning state instead of the process-wide one, e.g.
	/// one writing to a custom sink.
	pub fn portability_warning(mut self, warning: Arc<PortabilityWarning>) -> Self {
		self.warning = Some(warning);
		self
	}

	/// Replace the `mkdir` implementation. `config.dir_mode` is ignored when
	/// a creator is supplied.
	pub fn dir_creator(mut self, creator: Arc<dyn DirCreator>) -> Self {
		self.creator = Some(creator);
		self
	}

	pub fn build(self) -> TempDirMaker {
		let creator = self
			.creator
			.unwrap_or_else(|| Arc::new(RealDirCreator::new(self.config.dir_mode)));
		let warning = self.warning.unwrap_or_else(process_warning);

		TempDirMaker {
			core: Arc::new(MakerCore {
				max_attempts: self.config.max_attempts,
				warning,
				creator,
			}),
			worker_threads: self.config.worker_threads,
			pool: Arc::new(OnceLock::new()),
		}
	}
}
