//! Local persistence of the event collection.
//!
//! The whole collection is stored as one JSON document: load on start,
//! save on every mutation.

use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{EventScopeError, EventScopeResult};
use crate::event::Event;

/// Durable storage for the event collection.
pub trait EventStore: Send + Sync {
    /// Load the stored collection. A missing or unreadable file yields an
    /// empty collection; the failure is logged, not raised.
    fn load(&self) -> Vec<Event>;

    /// Persist the full collection.
    fn save(&self, events: &[Event]) -> EventScopeResult<()>;
}

/// Stores the collection as a single JSON file.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStore { path: path.into() }
    }

    /// Sibling temp file, so the rename stays on one filesystem.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl EventStore for JsonStore {
    fn load(&self) -> Vec<Event> {
        if !self.path.exists() {
            return Vec::new();
        }

        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("Could not read {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!("Could not parse {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    fn save(&self, events: &[Event]) -> EventScopeResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EventScopeError::Persistence(format!(
                    "Failed to create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let contents = serde_json::to_string_pretty(events)
            .map_err(|e| EventScopeError::Serialization(e.to_string()))?;

        // Write to a temp file first, then rename into place (atomic on
        // POSIX when both paths share a filesystem)
        let temp_path = self.temp_path();
        std::fs::write(&temp_path, contents).map_err(|e| {
            EventScopeError::Persistence(format!(
                "Failed to write {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        std::fs::rename(&temp_path, &self.path).map_err(|e| {
            EventScopeError::Persistence(format!(
                "Failed to rename into {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }
}

/// In-process store. Backs tests and ad-hoc schedules that have no data
/// file.
#[derive(Default)]
pub struct MemoryStore {
    events: Mutex<Vec<Event>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn seeded(events: Vec<Event>) -> Self {
        MemoryStore {
            events: Mutex::new(events),
        }
    }

    /// Copy of the last saved collection.
    pub fn snapshot(&self) -> Vec<Event> {
        self.events.lock().expect("store lock poisoned").clone()
    }
}

impl EventStore for MemoryStore {
    fn load(&self) -> Vec<Event> {
        self.snapshot()
    }

    fn save(&self, events: &[Event]) -> EventScopeResult<()> {
        *self.events.lock().expect("store lock poisoned") = events.to_vec();
        Ok(())
    }
}
