use std::io;
use std::path::PathBuf;

use snafu::Snafu;

/// Flat classification of [`MkdtempError`], for callers that only need to
/// branch on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	ParentNotFound,
	PermissionDenied,
	InvalidName,
	RetryExhausted,
	InvalidTemplate,
	Other,
}

/// Errors returned when a temporary directory could not be created.
///
/// Name collisions never show up here: they are retried until a free name is
/// found or the attempt limit is reached.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MkdtempError {
	/// The directory that should contain the new directory does not exist.
	#[snafu(display("Parent directory of {} does not exist: {source}", path.display()))]
	ParentNotFound {
		/// The candidate path that was being created.
		path: PathBuf,
		source: io::Error,
	},

	/// The caller may not create entries in the parent directory.
	#[snafu(display("Permission denied creating {}: {source}", path.display()))]
	PermissionDenied {
		/// The candidate path that was being created.
		path: PathBuf,
		source: io::Error,
	},

	/// The template holds bytes the filesystem does not accept in a name,
	/// or the resulting name is too long.
	#[snafu(display("Invalid directory name {}: {reason}", path.display()))]
	InvalidName {
		path: PathBuf,
		reason: String,
		/// The OS error behind the rejection, absent when the name was refused
		/// before reaching the filesystem.
		os_error: Option<io::Error>,
	},

	/// Every generated name was already taken.
	#[snafu(display(
		"Gave up after {attempts} attempts to find a free name for template {}",
		template.display()
	))]
	RetryExhausted { template: PathBuf, attempts: u32 },

	/// The template could not be turned into a path at all.
	#[snafu(display("Invalid template: {reason}"))]
	InvalidTemplate { reason: String },

	/// Any other failure reported by the operating system.
	#[snafu(display("Failed to create {}: {source}", path.display()))]
	Io { path: PathBuf, source: io::Error },
}

impl MkdtempError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			MkdtempError::ParentNotFound { .. } => ErrorKind::ParentNotFound,
			MkdtempError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
			MkdtempError::InvalidName { .. } => ErrorKind::InvalidName,
			MkdtempError::RetryExhausted { .. } => ErrorKind::RetryExhausted,
			MkdtempError::InvalidTemplate { .. } => ErrorKind::InvalidTemplate,
			MkdtempError::Io { .. } => ErrorKind::Other,
		}
	}

	/// The underlying OS error, when the failure came from the filesystem.
	pub fn os_error(&self) -> Option<&io::Error> {
		match self {
			MkdtempError::ParentNotFound { source, .. }
			| MkdtempError::PermissionDenied { source, .. }
			| MkdtempError::Io { source, .. } => Some(source),
			MkdtempError::InvalidName { os_error, .. } => os_error.as_ref(),
			MkdtempError::RetryExhausted { .. } | MkdtempError::InvalidTemplate { .. } => None,
		}
	}

	pub fn raw_os_error(&self) -> Option<i32> {
		self.os_error().and_then(io::Error::raw_os_error)
	}
}

impl From<MkdtempError> for io::Error {
	fn from(err: MkdtempError) -> Self {
		let kind = match err.kind() {
			ErrorKind::ParentNotFound => io::ErrorKind::NotFound,
			ErrorKind::PermissionDenied => io::ErrorKind::PermissionDenied,
			ErrorKind::InvalidName | ErrorKind::InvalidTemplate => io::ErrorKind::InvalidInput,
			ErrorKind::RetryExhausted => io::ErrorKind::AlreadyExists,
			ErrorKind::Other => match &err {
				MkdtempError::Io { source, .. } => source.kind(),
				_ => io::ErrorKind::Other,
			},
		};
		io::Error::new(kind, err)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_kind_matches_variant() {
		let err = MkdtempError::RetryExhausted {
			template: PathBuf::from("/tmp/foo."),
			attempts: 3,
		};
		assert_eq!(err.kind(), ErrorKind::RetryExhausted);
		assert_eq!(
			err.to_string(),
			"Gave up after 3 attempts to find a free name for template /tmp/foo."
		);
	}

	#[test]
	fn test_converts_into_io_error_with_matching_kind() {
		let err = MkdtempError::ParentNotFound {
			path: PathBuf::from("/missing/foo.abcdef"),
			source: io::Error::from(io::ErrorKind::NotFound),
		};
		let io_err: io::Error = err.into();
		assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
		assert!(io_err.to_string().contains("/missing/foo.abcdef"));

		let err = MkdtempError::Io {
			path: PathBuf::from("/tmp/foo.abcdef"),
			source: io::Error::from(io::ErrorKind::StorageFull),
		};
		let io_err: io::Error = err.into();
		assert_eq!(io_err.kind(), io::ErrorKind::StorageFull);
	}

	#[test]
	fn test_exposes_os_error_of_invalid_name() {
		let err = MkdtempError::InvalidName {
			path: PathBuf::from("/tmp/foo.abcdef"),
			reason: "name too long".to_string(),
			os_error: Some(io::Error::from_raw_os_error(36)),
		};
		assert_eq!(err.raw_os_error(), Some(36));

		let err = MkdtempError::InvalidName {
			path: PathBuf::from("/tmp/fo\0o."),
			reason: "contains a NUL byte".to_string(),
			os_error: None,
		};
		assert!(err.os_error().is_none());

		let err = MkdtempError::RetryExhausted {
			template: PathBuf::from("/tmp/foo."),
			attempts: 1,
		};
		assert!(err.os_error().is_none());
	}
}
