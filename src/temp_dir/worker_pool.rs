use crossbeam::channel::{Sender, unbounded};
use std::panic::{self, AssertUnwindSafe};
use std::thread;

pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

/// Fixed set of threads draining a shared job queue.
///
/// Dropping the pool closes the queue. Workers finish whatever is already
/// queued and then exit, nothing is cancelled.
pub(crate) struct WorkerPool {
	jobs: Sender<Job>,
	workers: usize,
}

impl WorkerPool {
	pub(crate) fn new(threads: usize) -> Self {
		let (jobs, queue) = unbounded::<Job>();

		let mut workers = 0;
		for idx in 0..threads.max(1) {
			let queue = queue.clone();
			let spawned = thread::Builder::new()
				.name(format!("mkdtemp-worker-{idx}"))
				.spawn(move || {
					for job in queue {
						if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
							tracing::error!("mkdtemp worker job panicked");
						}
					}
				});
			match spawned {
				Ok(_) => workers += 1,
				Err(e) => tracing::warn!("failed to spawn mkdtemp worker {idx}: {e}"),
			}
		}

		WorkerPool { jobs, workers }
	}

	pub(crate) fn execute(&self, job: Job) {
		if self.workers > 0 {
			match self.jobs.send(job) {
				Ok(()) => return,
				Err(returned) => Self::run_detached(returned.into_inner()),
			}
		} else {
			Self::run_detached(job);
		}
	}

	// Last resort when no worker is available, so every job still runs once
	fn run_detached(job: Job) {
		if let Err(e) = thread::Builder::new().spawn(job) {
			tracing::error!("failed to spawn thread for mkdtemp job: {e}");
		}
	}

	pub(crate) fn workers(&self) -> usize {
		self.workers
	}
}
