//! Creation of uniquely named temporary directories from a path template.
//!
//! A template is a path prefix. Six random alphanumeric characters are
//! appended to it and the result is created with a single, non-recursive
//! `mkdir`. Name collisions are retried, every other failure is returned
//! to the caller.

pub mod created_path;
pub mod dir_creator;
pub mod error;
pub mod file_url;
pub mod maker;
mod os_error;
pub mod portability;
pub mod suffix;
pub mod template;
mod worker_pool;

use std::sync::OnceLock;

use crate::temp_dir::created_path::CreatedPath;
use crate::temp_dir::error::MkdtempError;
use crate::temp_dir::maker::{MkdtempOptions, TempDirMaker};
use crate::temp_dir::template::Template;

static DEFAULT_MAKER: OnceLock<TempDirMaker> = OnceLock::new();

/// The process-wide maker used by [`mkdtemp`] and [`mkdtemp_async`].
///
/// It reports the trailing `X` portability warning through `tracing`, so the
/// warning fires at most once for the lifetime of the process.
pub fn default_maker() -> &'static TempDirMaker {
	DEFAULT_MAKER.get_or_init(TempDirMaker::new)
}

/// Create a new directory named `template` plus a random suffix, blocking
/// until it exists or creation fails.
pub fn mkdtemp(
	template: impl Into<Template>,
	options: Option<MkdtempOptions>,
) -> Result<CreatedPath, MkdtempError> {
	default_maker().create(template, options)
}

/// Same as [`mkdtemp`], but runs on the shared worker pool and hands the
/// result to `callback` exactly once.
pub fn mkdtemp_async<F>(template: impl Into<Template>, options: Option<MkdtempOptions>, callback: F)
where
	F: FnOnce(Result<CreatedPath, MkdtempError>) + Send + 'static,
{
	default_maker().create_async(template, options, callback)
}
