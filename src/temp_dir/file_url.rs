use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use snafu::ensure;

use crate::temp_dir::error::{InvalidTemplateSnafu, MkdtempError};
use crate::temp_dir::template::{bytes_to_path, path_to_bytes};

const SCHEME: &str = "file:";

/// A `file:` URL that has already been resolved to a local path.
///
/// Only URLs without a host, or with `localhost` as the host, are accepted.
/// The path is percent-decoded once at parse time and kept as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUrl {
	path: Vec<u8>,
}

impl FileUrl {
	pub fn parse(input: &str) -> Result<Self, MkdtempError> {
		let rest = match input.get(..SCHEME.len()) {
			Some(scheme) if scheme.eq_ignore_ascii_case(SCHEME) => &input[SCHEME.len()..],
			_ => {
				return InvalidTemplateSnafu {
					reason: format!("not a file: URL: {input}"),
				}
				.fail();
			}
		};

		// query and fragment never name part of the path
		let rest = &rest[..rest.find(['?', '#']).unwrap_or(rest.len())];

		let path = match rest.strip_prefix("//") {
			Some(authority_and_path) => {
				let (host, path) = authority_and_path.split_at(
					authority_and_path
						.find('/')
						.unwrap_or(authority_and_path.len()),
				);
				ensure!(
					host.is_empty() || host.eq_ignore_ascii_case("localhost"),
					InvalidTemplateSnafu {
						reason: format!("file URL host must be empty or localhost, got {host}"),
					}
				);
				path
			}
			None => rest,
		};

		ensure!(
			path.starts_with('/'),
			InvalidTemplateSnafu {
				reason: format!("file URL must contain an absolute path: {input}"),
			}
		);
		ensure!(
			!has_encoded_separator(path),
			InvalidTemplateSnafu {
				reason: format!("file URL path must not include encoded separators: {input}"),
			}
		);

		let decoded = urlencoding::decode_binary(path.as_bytes()).into_owned();
		Ok(FileUrl {
			path: remove_dot_segments(&url_path_to_local(decoded)),
		})
	}

	/// Build the URL for `path`, resolving it against the current directory
	/// when it is relative.
	pub fn from_path(path: &Path) -> io::Result<Self> {
		let mut bytes = path_to_bytes(&std::path::absolute(path)?);
		let wants_trailing_separator = path_to_bytes(path)
			.last()
			.is_some_and(|&b| is_separator(b));
		if wants_trailing_separator && !bytes.last().is_some_and(|&b| is_separator(b)) {
			bytes.push(std::path::MAIN_SEPARATOR as u8);
		}
		Ok(FileUrl { path: bytes })
	}

	/// Resolve `reference` against this URL the way a relative URL reference
	/// is resolved: the last path segment is replaced, so a directory URL
	/// needs a trailing slash to keep its final component. `.` and `..`
	/// segments are collapsed, query and fragment are dropped, and references
	/// carrying their own scheme or host are parsed as URLs on their own.
	pub fn join(&self, reference: &str) -> Result<Self, MkdtempError> {
		if has_scheme(reference) {
			return FileUrl::parse(reference);
		}
		if reference.starts_with("//") {
			return FileUrl::parse(&format!("{SCHEME}{reference}"));
		}

		let reference = &reference[..reference.find(['?', '#']).unwrap_or(reference.len())];
		ensure!(
			!has_encoded_separator(reference),
			InvalidTemplateSnafu {
				reason: format!("URL reference must not include encoded separators: {reference}"),
			}
		);

		let decoded = urlencoding::decode_binary(reference.as_bytes()).into_owned();
		let path = if reference.starts_with('/') {
			url_path_to_local(decoded)
		} else {
			let keep = self
				.path
				.iter()
				.rposition(|&b| is_separator(b))
				.map_or(0, |idx| idx + 1);
			let mut path = self.path[..keep].to_vec();
			path.extend_from_slice(&url_path_to_local(decoded));
			path
		};
		Ok(FileUrl {
			path: remove_dot_segments(&path),
		})
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.path
	}

	pub fn to_path_buf(&self) -> PathBuf {
		bytes_to_path(&self.path)
	}
}

impl FromStr for FileUrl {
	type Err = MkdtempError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		FileUrl::parse(s)
	}
}

impl fmt::Display for FileUrl {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{SCHEME}//")?;
		if !self.path.first().is_some_and(|&b| is_separator(b)) {
			f.write_str("/")?;
		}
		for (idx, segment) in self.path.split(|&b| is_separator(b)).enumerate() {
			if idx > 0 {
				f.write_str("/")?;
			}
			if idx == 0 && cfg!(windows) && is_drive_segment(segment) {
				// the drive colon stays literal: file:///C:/dir
				f.write_str(&String::from_utf8_lossy(segment))?;
			} else {
				f.write_str(&urlencoding::encode_binary(segment))?;
			}
		}
		Ok(())
	}
}

/// `scheme:` prefix as in RFC 3986: a letter, then letters, digits, `+`, `-`
/// or `.`, ending at the first `:` before any `/`.
fn has_scheme(reference: &str) -> bool {
	let Some(colon) = reference.find(':') else {
		return false;
	};
	let scheme = &reference[..colon];
	!scheme.contains('/')
		&& scheme
			.chars()
			.next()
			.is_some_and(|c| c.is_ascii_alphabetic())
		&& scheme
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
		&& !is_drive_letter(scheme)
}

fn is_drive_letter(scheme: &str) -> bool {
	cfg!(windows) && scheme.len() == 1
}

/// Collapse `.` and `..` segments. The first segment is the root and is never
/// removed; a trailing dot segment leaves the path ending in a separator.
fn remove_dot_segments(path: &[u8]) -> Vec<u8> {
	let parts: Vec<&[u8]> = path.split(|&b| is_separator(b)).collect();
	let last = parts.len() - 1;
	let mut kept: Vec<&[u8]> = Vec::with_capacity(parts.len());
	for (idx, segment) in parts.into_iter().enumerate() {
		match segment {
			b"." | b".." => {
				if segment == b".." && kept.len() > 1 {
					kept.pop();
				}
				if idx == last {
					kept.push(b"");
				}
			}
			_ => kept.push(segment),
		}
	}
	kept.join(&(std::path::MAIN_SEPARATOR as u8))
}

/// `C:` style first segment of a Windows path.
fn is_drive_segment(segment: &[u8]) -> bool {
	segment.len() == 2 && segment[0].is_ascii_alphabetic() && segment[1] == b':'
}

fn has_encoded_separator(path: &str) -> bool {
	let lower = path.to_ascii_lowercase();
	lower.contains("%2f") || (cfg!(windows) && lower.contains("%5c"))
}

#[cfg(windows)]
fn is_separator(byte: u8) -> bool {
	byte == b'/' || byte == b'\\'
}

#[cfg(not(windows))]
fn is_separator(byte: u8) -> bool {
	byte == b'/'
}

#[cfg(windows)]
fn url_path_to_local(mut path: Vec<u8>) -> Vec<u8> {
	// "/C:/dir" names the drive path "C:\dir"
	if path.len() >= 3 && path[0] == b'/' && path[1].is_ascii_alphabetic() && path[2] == b':' {
		path.remove(0);
	}
	path.iter()
		.map(|&b| if b == b'/' { b'\\' } else { b })
		.collect()
}

#[cfg(not(windows))]
fn url_path_to_local(path: Vec<u8>) -> Vec<u8> {
	path
}
