use std::fs::DirBuilder;
use std::io;
use std::path::Path;

/// Mode for new directories: owner-only access.
pub const DEFAULT_DIR_MODE: u32 = 0o700;

/// Trait for creating a single directory - allows testing with scripted
/// filesystem failures
pub trait DirCreator: Send + Sync {
	/// Create `path`, failing with [`io::ErrorKind::AlreadyExists`] when
	/// anything is already there. Parents are never created.
	fn create_dir(&self, path: &Path) -> io::Result<()>;
}

/// Production implementation using a single `mkdir` call
pub struct RealDirCreator {
	mode: u32,
}

impl RealDirCreator {
	pub fn new(mode: u32) -> Self {
		RealDirCreator { mode }
	}
}

impl Default for RealDirCreator {
	fn default() -> Self {
		Self::new(DEFAULT_DIR_MODE)
	}
}

impl DirCreator for RealDirCreator {
	fn create_dir(&self, path: &Path) -> io::Result<()> {
		let mut builder = DirBuilder::new();
		builder.recursive(false);

		#[cfg(unix)]
		{
			use std::os::unix::fs::DirBuilderExt;
			builder.mode(self.mode);
		}

		builder.create(path)
	}
}

/// Test implementation replaying a fixed list of outcomes, then creating
/// nothing and reporting success
#[cfg(test)]
pub struct ScriptedDirCreator {
	outcomes: std::sync::Mutex<std::collections::VecDeque<Option<io::ErrorKind>>>,
	attempts: std::sync::Mutex<Vec<std::path::PathBuf>>,
}

#[cfg(test)]
impl ScriptedDirCreator {
	/// `None` entries succeed, `Some(kind)` entries fail with that kind.
	pub fn new(outcomes: impl IntoIterator<Item = Option<io::ErrorKind>>) -> Self {
		ScriptedDirCreator {
			outcomes: std::sync::Mutex::new(outcomes.into_iter().collect()),
			attempts: std::sync::Mutex::new(Vec::new()),
		}
	}

	pub fn attempts(&self) -> Vec<std::path::PathBuf> {
		self.attempts.lock().unwrap().clone()
	}
}

#[cfg(test)]
impl DirCreator for ScriptedDirCreator {
	fn create_dir(&self, path: &Path) -> io::Result<()> {
		self.attempts.lock().unwrap().push(path.to_path_buf());
		match self.outcomes.lock().unwrap().pop_front().flatten() {
			Some(kind) => Err(io::Error::from(kind)),
			None => Ok(()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::tempdir;

	#[test]
	fn test_creates_directory() -> io::Result<()> {
		let temp_dir = tempdir()?;
		let path = temp_dir.path().join("fresh");

		RealDirCreator::default().create_dir(&path)?;

		assert!(path.is_dir());
		Ok(())
	}

	#[test]
	fn test_existing_directory_is_reported() -> io::Result<()> {
		let temp_dir = tempdir()?;
		let path = temp_dir.path().join("taken");
		std::fs::create_dir(&path)?;

		let err = RealDirCreator::default().create_dir(&path).unwrap_err();

		assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
		Ok(())
	}

	#[test]
	fn test_does_not_create_parents() -> io::Result<()> {
		let temp_dir = tempdir()?;
		let path = temp_dir.path().join("missing").join("child");

		let err = RealDirCreator::default().create_dir(&path).unwrap_err();

		assert_eq!(err.kind(), io::ErrorKind::NotFound);
		assert!(!temp_dir.path().join("missing").exists());
		Ok(())
	}

	#[cfg(unix)]
	#[test]
	fn test_applies_owner_only_mode() -> io::Result<()> {
		use std::os::unix::fs::PermissionsExt;

		let temp_dir = tempdir()?;
		let path = temp_dir.path().join("private");

		RealDirCreator::default().create_dir(&path)?;

		// umask can only remove bits, never add group or other access
		let mode = std::fs::metadata(&path)?.permissions().mode() & 0o777;
		assert_eq!(mode & 0o077, 0, "mode was {mode:o}");
		Ok(())
	}

	#[test]
	fn test_scripted_creator_replays_outcomes() {
		let creator = ScriptedDirCreator::new([Some(io::ErrorKind::AlreadyExists), None]);

		let first = creator.create_dir(Path::new("/a"));
		let second = creator.create_dir(Path::new("/b"));

		assert_eq!(first.unwrap_err().kind(), io::ErrorKind::AlreadyExists);
		assert!(second.is_ok());
		assert_eq!(creator.attempts().len(), 2);
	}
}
