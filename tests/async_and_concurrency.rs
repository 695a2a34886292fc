mod common;

use common::create_test_folder;
use crossbeam::channel::{RecvTimeoutError, bounded, unbounded};
use mkdtemp::{CreatedPath, ErrorKind, MkdtempError, MkdtempOptions, TempDirMaker};
use std::collections::HashSet;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(10);

/// Run one async creation and collect every callback invocation
fn invocations(
	maker: &TempDirMaker,
	template: PathBuf,
	options: Option<MkdtempOptions>,
) -> Vec<Result<CreatedPath, MkdtempError>> {
	let (tx, rx) = unbounded();
	maker.create_async(template, options, move |result| {
		tx.send(result).unwrap();
	});

	let mut results = vec![rx.recv_timeout(TIMEOUT).expect("callback should run")];
	// the sender is gone once the callback returned, nothing else may arrive
	match rx.recv_timeout(Duration::from_millis(100)) {
		Err(RecvTimeoutError::Disconnected) => (),
		other => results.push(other.expect("unexpected second invocation")),
	}
	results
}

#[test]
fn test_callback_runs_once_with_created_path() -> io::Result<()> {
	let temp_dir = create_test_folder();
	let maker = TempDirMaker::new();

	let results = invocations(&maker, temp_dir.path().join("bar."), None);

	assert_eq!(results.len(), 1);
	let created = results.into_iter().next().unwrap()?;
	assert!(created.to_path_buf().is_dir());
	Ok(())
}

#[test]
fn test_empty_options_behave_like_no_options() -> io::Result<()> {
	let temp_dir = create_test_folder();
	let maker = TempDirMaker::new();

	let without = invocations(&maker, temp_dir.path().join("bar."), None);
	let with_empty = invocations(
		&maker,
		temp_dir.path().join("bar."),
		Some(MkdtempOptions::default()),
	);

	assert_eq!(without.len(), 1);
	assert_eq!(with_empty.len(), 1);
	for result in without.into_iter().chain(with_empty) {
		let created = result?;
		assert!(matches!(created, CreatedPath::Text(_)), "{created:?}");
		assert!(created.to_path_buf().is_dir());
	}
	Ok(())
}

#[test]
fn test_async_error_is_passed_to_callback() {
	let temp_dir = create_test_folder();
	let maker = TempDirMaker::new();

	let results = invocations(&maker, temp_dir.path().join("missing").join("bar."), None);

	assert_eq!(results.len(), 1);
	match &results[0] {
		Err(e) => assert_eq!(e.kind(), ErrorKind::ParentNotFound),
		Ok(created) => panic!("expected failure, created {created}"),
	}
}

#[test]
fn test_async_does_not_block_caller() {
	let temp_dir = create_test_folder();
	let maker = TempDirMaker::builder().worker_threads(1).build();
	let (gate_tx, gate_rx) = bounded::<()>(0);
	let (done_tx, done_rx) = bounded(1);

	// occupy the only worker until the gate opens
	maker.create_async(temp_dir.path().join("first."), None, move |_| {
		let _ = gate_rx.recv_timeout(TIMEOUT);
	});
	maker.create_async(temp_dir.path().join("second."), None, move |result| {
		done_tx.send(result.is_ok()).unwrap();
	});

	// both calls returned while the worker is still busy
	assert!(done_rx.try_recv().is_err());
	gate_tx.send(()).unwrap();
	assert_eq!(done_rx.recv_timeout(TIMEOUT), Ok(true));
}

#[test]
fn test_concurrent_threads_get_distinct_directories() -> io::Result<()> {
	let temp_dir = create_test_folder();
	let maker = TempDirMaker::new();
	let template = Arc::new(temp_dir.path().join("race."));

	let handles: Vec<_> = (0..8)
		.map(|_| {
			let maker = maker.clone();
			let template = Arc::clone(&template);
			thread::spawn(move || {
				(0..25)
					.map(|_| maker.create(template.as_path(), None).map(|p| p.to_path_buf()))
					.collect::<Result<Vec<_>, _>>()
			})
		})
		.collect();

	let mut paths = HashSet::new();
	for handle in handles {
		for path in handle.join().expect("thread panicked")? {
			assert!(path.is_dir());
			assert!(paths.insert(path.clone()), "{path:?} returned twice");
		}
	}

	assert_eq!(paths.len(), 200);
	Ok(())
}

#[test]
fn test_concurrent_tasks_get_distinct_directories() -> io::Result<()> {
	let temp_dir = create_test_folder();
	let maker = TempDirMaker::new();

	let tasks: Vec<_> = (0..100)
		.map(|_| maker.create_task(temp_dir.path().join("task."), None))
		.collect();

	let mut paths = HashSet::new();
	for task in tasks {
		let created = task.recv_timeout(TIMEOUT).expect("task should complete")?;
		assert!(paths.insert(created.to_path_buf()));
	}

	assert_eq!(paths.len(), 100);
	assert_eq!(std::fs::read_dir(temp_dir.path())?.count(), 100);
	Ok(())
}
