//! Integration tests for completion persistence and its failure tolerance.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{RecordingPresenter, RecordingSurface};
use polytour_core::EventBus;
use polytour_guide::{
    CompletionStore, JsonFileStorage, MarkerStorage, ScheduledTask, Scheduler, StorageError,
    TimerHandle, TourController,
};

/// Scheduler whose timers never fire; these tests exercise no deferrals.
struct NeverScheduler;

impl Scheduler for NeverScheduler {
    fn schedule(&self, _delay: Duration, _task: ScheduledTask) -> TimerHandle {
        TimerHandle::new()
    }
}

/// Storage whose writes always fail.
struct FailingStorage;

impl MarkerStorage for FailingStorage {
    fn read(&self, _key: &str) -> Option<String> {
        None
    }

    fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("medium rejected write".to_string()))
    }
}

#[test]
fn test_file_backed_round_trip() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let path = dir.path().join("onboarding.json");

    let mut store = CompletionStore::new(Arc::new(JsonFileStorage::new(&path)));
    assert!(!store.is_completed());

    store.mark_completed();

    // A fresh instance over the same file sees the marker
    let reloaded = CompletionStore::new(Arc::new(JsonFileStorage::new(&path)));
    assert!(reloaded.is_completed());

    // And reset clears it durably
    let mut store = CompletionStore::new(Arc::new(JsonFileStorage::new(&path)));
    store.reset();
    let reloaded = CompletionStore::new(Arc::new(JsonFileStorage::new(&path)));
    assert!(!reloaded.is_completed());
}

#[test]
fn test_malformed_file_degrades_to_not_completed() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let path = dir.path().join("onboarding.json");
    std::fs::write(&path, "definitely not json").expect("Should write file");

    let store = CompletionStore::new(Arc::new(JsonFileStorage::new(&path)));
    assert!(!store.is_completed());
    assert!(store.markers().is_empty());
}

#[test]
fn test_write_failure_leaves_tour_functional() {
    let bus = EventBus::new();
    let presenter = Arc::new(RecordingPresenter::new());
    let surface = Arc::new(RecordingSurface::new());
    let tour = TourController::new(
        &bus,
        presenter.clone(),
        surface,
        Arc::new(NeverScheduler),
        CompletionStore::new(Arc::new(FailingStorage)),
    );

    assert!(tour.start());
    tour.complete_tour();

    // The save failed silently; this session still counts as completed and
    // the presenter was told to finish
    assert!(tour.is_completed());
    assert!(!tour.is_active());
    assert_eq!(presenter.completes(), 1);
}
