//! Durable completion state.
//!
//! The tour persists a single record: a JSON-encoded list of string markers
//! under one storage key. Only the `"completed"` marker is semantically
//! checked. An absent key or an unparsable value degrades to the empty list,
//! and write failures are logged and swallowed; the tour must stay usable
//! without durable storage.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::StorageError;

/// Marker checked for tour completion.
const COMPLETED_MARKER: &str = "completed";

/// Key-value string storage, implemented by the host over whatever medium it
/// has (browser local storage, a settings file, a test map).
pub trait MarkerStorage: Send + Sync {
    /// Read the raw value stored under `key`, if any.
    fn read(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory storage backend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value, e.g. to simulate a previous session in tests.
    pub fn seed(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
    }
}

impl MarkerStorage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed storage: one JSON object per file, keys to raw string values.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Create a store over the given file. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> HashMap<String, String> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default()
    }
}

impl MarkerStorage for JsonFileStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.load().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.load();
        entries.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}

/// The persisted completion record: loaded once at construction, written on
/// every mutation, best-effort.
pub struct CompletionStore {
    storage: Arc<dyn MarkerStorage>,
    key: String,
    markers: Vec<String>,
}

impl CompletionStore {
    /// Default storage key for the completion record.
    pub const DEFAULT_KEY: &'static str = "polytour-onboarding-completed";

    /// Load the record from storage under the default key.
    pub fn new(storage: Arc<dyn MarkerStorage>) -> Self {
        Self::with_key(storage, Self::DEFAULT_KEY)
    }

    /// Load the record from storage under a custom key.
    pub fn with_key(storage: Arc<dyn MarkerStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let markers = storage
            .read(&key)
            .and_then(|raw| serde_json::from_str::<Vec<String>>(&raw).ok())
            .unwrap_or_default();
        Self {
            storage,
            key,
            markers,
        }
    }

    /// Whether the tour has been completed in this or a previous session.
    pub fn is_completed(&self) -> bool {
        self.markers.iter().any(|m| m == COMPLETED_MARKER)
    }

    /// Append the completion marker and persist.
    pub fn mark_completed(&mut self) {
        if !self.is_completed() {
            self.markers.push(COMPLETED_MARKER.to_string());
        }
        self.save();
    }

    /// Clear all markers and persist, for replay or testing.
    pub fn reset(&mut self) {
        self.markers.clear();
        self.save();
    }

    /// The raw marker list.
    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    fn save(&self) {
        match serde_json::to_string(&self.markers) {
            Ok(encoded) => {
                if let Err(err) = self.storage.write(&self.key, &encoded) {
                    tracing::warn!("Failed to persist completion state: {}", err);
                }
            }
            Err(err) => tracing::warn!("Failed to encode completion state: {}", err),
        }
    }
}

impl std::fmt::Debug for CompletionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionStore")
            .field("key", &self.key)
            .field("markers", &self.markers)
            .finish()
    }
}
