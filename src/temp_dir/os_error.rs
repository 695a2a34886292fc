use std::io;
use std::path::PathBuf;

use crate::temp_dir::error::MkdtempError;

/// How a failed `mkdir` should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MkdirFailure {
	/// The candidate name is taken, try another one.
	AlreadyExists,
	ParentNotFound,
	PermissionDenied,
	InvalidName,
	Other,
}

impl MkdirFailure {
	pub(crate) fn classify(err: &io::Error) -> Self {
		if let Some(code) = err.raw_os_error()
			&& let Some(failure) = classify_os_code(code)
		{
			return failure;
		}

		match err.kind() {
			io::ErrorKind::AlreadyExists => MkdirFailure::AlreadyExists,
			io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => MkdirFailure::ParentNotFound,
			io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem => {
				MkdirFailure::PermissionDenied
			}
			io::ErrorKind::InvalidInput | io::ErrorKind::InvalidFilename => {
				MkdirFailure::InvalidName
			}
			_ => MkdirFailure::Other,
		}
	}

	/// Turn a fatal failure into the error handed back to the caller.
	pub(crate) fn into_error(self, path: PathBuf, source: io::Error) -> MkdtempError {
		match self {
			MkdirFailure::ParentNotFound => MkdtempError::ParentNotFound { path, source },
			MkdirFailure::PermissionDenied => MkdtempError::PermissionDenied { path, source },
			MkdirFailure::InvalidName => MkdtempError::InvalidName {
				path,
				reason: source.to_string(),
				os_error: Some(source),
			},
			MkdirFailure::AlreadyExists | MkdirFailure::Other => MkdtempError::Io { path, source },
		}
	}
}

#[cfg(unix)]
fn classify_os_code(code: i32) -> Option<MkdirFailure> {
	match code {
		libc::EEXIST => Some(MkdirFailure::AlreadyExists),
		libc::ENOENT | libc::ENOTDIR => Some(MkdirFailure::ParentNotFound),
		libc::EACCES | libc::EPERM | libc::EROFS => Some(MkdirFailure::PermissionDenied),
		libc::ENAMETOOLONG | libc::EINVAL | libc::EILSEQ => Some(MkdirFailure::InvalidName),
		_ => None,
	}
}

#[cfg(windows)]
fn classify_os_code(code: i32) -> Option<MkdirFailure> {
	use winapi::shared::winerror::{
		ERROR_ACCESS_DENIED, ERROR_ALREADY_EXISTS, ERROR_BAD_PATHNAME, ERROR_DIRECTORY,
		ERROR_FILE_EXISTS, ERROR_FILE_NOT_FOUND, ERROR_FILENAME_EXCED_RANGE, ERROR_INVALID_NAME,
		ERROR_PATH_NOT_FOUND, ERROR_WRITE_PROTECT,
	};

	match code as u32 {
		ERROR_ALREADY_EXISTS | ERROR_FILE_EXISTS => Some(MkdirFailure::AlreadyExists),
		ERROR_PATH_NOT_FOUND | ERROR_FILE_NOT_FOUND | ERROR_DIRECTORY => {
			Some(MkdirFailure::ParentNotFound)
		}
		ERROR_ACCESS_DENIED | ERROR_WRITE_PROTECT => Some(MkdirFailure::PermissionDenied),
		ERROR_INVALID_NAME | ERROR_BAD_PATHNAME | ERROR_FILENAME_EXCED_RANGE => {
			Some(MkdirFailure::InvalidName)
		}
		_ => None,
	}
}

#[cfg(not(any(unix, windows)))]
fn classify_os_code(_code: i32) -> Option<MkdirFailure> {
	None
}
