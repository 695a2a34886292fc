use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::temp_dir::template::bytes_to_path;

/// Representation the created path is handed back in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding {
	#[default]
	Utf8,
	/// One char per byte, for callers that want a lossless string form of
	/// non-UTF-8 names.
	Latin1,
	/// The raw bytes of the path.
	Buffer,
}

impl FromStr for Encoding {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"utf8" | "utf-8" => Ok(Encoding::Utf8),
			"latin1" | "binary" => Ok(Encoding::Latin1),
			"buffer" => Ok(Encoding::Buffer),
			other => Err(format!(
				"unknown encoding '{other}', expected one of utf8, latin1, buffer"
			)),
		}
	}
}

/// Path of a directory created by the maker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatedPath {
	Text(String),
	Buffer(Vec<u8>),
}

impl CreatedPath {
	/// Without an explicit encoding, names that are not valid UTF-8 come back
	/// as raw bytes so the result still names the created directory.
	pub(crate) fn encode(bytes: Vec<u8>, encoding: Option<Encoding>) -> Self {
		let Some(encoding) = encoding else {
			return match String::from_utf8(bytes) {
				Ok(text) => CreatedPath::Text(text),
				Err(err) => CreatedPath::Buffer(err.into_bytes()),
			};
		};

		match encoding {
			Encoding::Utf8 => CreatedPath::Text(
				String::from_utf8(bytes)
					.unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned()),
			),
			Encoding::Latin1 => CreatedPath::Text(bytes.iter().map(|&b| char::from(b)).collect()),
			Encoding::Buffer => CreatedPath::Buffer(bytes),
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			CreatedPath::Text(text) => Some(text),
			CreatedPath::Buffer(_) => None,
		}
	}

	pub fn as_bytes(&self) -> &[u8] {
		match self {
			CreatedPath::Text(text) => text.as_bytes(),
			CreatedPath::Buffer(bytes) => bytes,
		}
	}

	/// Filesystem path for this value.
	///
	/// Text produced with [`Encoding::Latin1`] is taken as-is, so it only
	/// names the created directory when the original bytes were ASCII.
	pub fn to_path_buf(&self) -> PathBuf {
		match self {
			CreatedPath::Text(text) => PathBuf::from(text),
			CreatedPath::Buffer(bytes) => bytes_to_path(bytes),
		}
	}
}

impl fmt::Display for CreatedPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CreatedPath::Text(text) => f.write_str(text),
			CreatedPath::Buffer(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
		}
	}
}
