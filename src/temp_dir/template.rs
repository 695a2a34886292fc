use std::path::{Path, PathBuf};

use crate::temp_dir::file_url::FileUrl;

/// Trailing character of the old `XXXXXX` templating convention.
pub const LEGACY_PLACEHOLDER: u8 = b'X';

/// A path prefix in any of the accepted representations.
///
/// Every variant is reduced to the same byte sequence by [`Template::as_bytes`],
/// nothing past that point looks at which variant was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
	Text(String),
	Buffer(Vec<u8>),
	ByteArray(Box<[u8]>),
	Url(FileUrl),
}

impl Template {
	pub fn as_bytes(&self) -> &[u8] {
		match self {
			Template::Text(text) => text.as_bytes(),
			Template::Buffer(buffer) => buffer,
			Template::ByteArray(bytes) => bytes,
			Template::Url(url) => url.as_bytes(),
		}
	}

	pub fn ends_with_placeholder(&self) -> bool {
		self.as_bytes().last() == Some(&LEGACY_PLACEHOLDER)
	}
}

impl From<&str> for Template {
	fn from(text: &str) -> Self {
		Template::Text(text.to_string())
	}
}

impl From<String> for Template {
	fn from(text: String) -> Self {
		Template::Text(text)
	}
}

impl From<Vec<u8>> for Template {
	fn from(buffer: Vec<u8>) -> Self {
		Template::Buffer(buffer)
	}
}

impl From<&[u8]> for Template {
	fn from(bytes: &[u8]) -> Self {
		Template::ByteArray(bytes.into())
	}
}

impl From<Box<[u8]>> for Template {
	fn from(bytes: Box<[u8]>) -> Self {
		Template::ByteArray(bytes)
	}
}

impl From<FileUrl> for Template {
	fn from(url: FileUrl) -> Self {
		Template::Url(url)
	}
}

impl From<&Path> for Template {
	fn from(path: &Path) -> Self {
		Template::Buffer(path_to_bytes(path))
	}
}

impl From<PathBuf> for Template {
	fn from(path: PathBuf) -> Self {
		Template::from(path.as_path())
	}
}

#[cfg(unix)]
pub(crate) fn path_to_bytes(path: &Path) -> Vec<u8> {
	use std::os::unix::ffi::OsStrExt;
	path.as_os_str().as_bytes().to_vec()
}

#[cfg(not(unix))]
pub(crate) fn path_to_bytes(path: &Path) -> Vec<u8> {
	path.to_string_lossy().into_owned().into_bytes()
}

#[cfg(unix)]
pub(crate) fn bytes_to_path(bytes: &[u8]) -> PathBuf {
	use std::ffi::OsStr;
	use std::os::unix::ffi::OsStrExt;
	PathBuf::from(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
pub(crate) fn bytes_to_path(bytes: &[u8]) -> PathBuf {
	PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}
