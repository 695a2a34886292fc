#![allow(dead_code)]

use mkdtemp::{PortabilityWarning, RecordingSink, TempDirMaker};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub const SUFFIX_LEN: usize = 6;

pub fn create_test_folder() -> TempDir {
	TempDir::new().unwrap()
}

/// Maker whose portability warnings land in the returned sink
pub fn recording_maker() -> (TempDirMaker, Arc<RecordingSink>) {
	let sink = Arc::new(RecordingSink::new());
	let maker = TempDirMaker::builder()
		.portability_warning(Arc::new(PortabilityWarning::new(sink.clone())))
		.build();
	(maker, sink)
}

#[cfg(unix)]
pub fn basename_bytes(path: &Path) -> Vec<u8> {
	use std::os::unix::ffi::OsStrExt;
	path.file_name().unwrap().as_bytes().to_vec()
}

#[cfg(not(unix))]
pub fn basename_bytes(path: &Path) -> Vec<u8> {
	path.file_name()
		.unwrap()
		.to_string_lossy()
		.into_owned()
		.into_bytes()
}

/// Strip the random suffix from a created directory's name
pub fn basename_without_suffix(path: &Path) -> Vec<u8> {
	let name = basename_bytes(path);
	assert!(name.len() >= SUFFIX_LEN, "name too short: {name:?}");
	name[..name.len() - SUFFIX_LEN].to_vec()
}
