//! The event lifecycle.
//!
//! `Schedule` owns the canonical event collection in memory and persists it
//! through an `EventStore` on every mutation. Its views and its sweep both
//! apply the retention predicate from [`crate::retention`], so nothing
//! expired is ever visible between sweep ticks.

use chrono::{DateTime, Duration, Utc};

use crate::error::{EventScopeError, EventScopeResult};
use crate::event::{Event, EventDraft};
use crate::retention;
use crate::store::EventStore;

/// Owns the event collection and implements its lifecycle.
///
/// Mutations persist the whole collection; when the save fails the
/// in-memory change is rolled back, so callers observe that the operation
/// did not take effect.
pub struct Schedule {
    events: Vec<Event>,
    store: Box<dyn EventStore>,
}

/// A soft-deleted event still inside its recovery window.
#[derive(Debug, Clone)]
pub struct Recoverable {
    pub event: Event,
    /// Time left until the sweeper may purge it.
    pub remaining: Duration,
}

impl Schedule {
    /// Load the schedule from the given store.
    pub fn load(store: Box<dyn EventStore>) -> Self {
        let events = store.load();
        Schedule { events, store }
    }

    /// Number of events in the collection, deleted included.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    // =========================================================================
    // Lifecycle operations
    // =========================================================================

    /// Create an event from a validated draft. The new event gets a fresh
    /// id and creation time and is appended to the collection.
    pub fn create(&mut self, draft: EventDraft) -> EventScopeResult<Event> {
        draft.validate()?;

        let event = Event::from_draft(draft, Utc::now());
        self.events.push(event.clone());

        if let Err(e) = self.persist() {
            self.events.pop();
            return Err(e);
        }
        Ok(event)
    }

    /// Replace the mutable fields of an active event with the draft.
    /// Identity and lifecycle fields (`id`, `created_at`, `deleted_at`,
    /// the mirror id) are preserved.
    pub fn update(&mut self, id: &str, draft: EventDraft) -> EventScopeResult<Event> {
        draft.validate()?;
        let idx = self.index_of_active(id)?;

        let previous = self.events[idx].clone();
        self.events[idx].apply(draft);

        if let Err(e) = self.persist() {
            self.events[idx] = previous;
            return Err(e);
        }
        Ok(self.events[idx].clone())
    }

    /// Mark an active event deleted, starting its recovery window.
    /// Fails with `NotFound` when the id is absent or already deleted.
    pub fn soft_delete(&mut self, id: &str) -> EventScopeResult<Event> {
        let idx = self
            .events
            .iter()
            .position(|e| e.id == id && !e.is_deleted())
            .ok_or_else(|| EventScopeError::NotFound(id.to_string()))?;

        self.events[idx].deleted_at = Some(Utc::now());

        if let Err(e) = self.persist() {
            self.events[idx].deleted_at = None;
            return Err(e);
        }
        Ok(self.events[idx].clone())
    }

    /// Clear the deletion mark on an event still inside its recovery
    /// window. The mirror id is left as-is; recovery does not touch the
    /// external copy.
    pub fn recover(&mut self, id: &str) -> EventScopeResult<Event> {
        self.recover_at(id, Utc::now())
    }

    pub(crate) fn recover_at(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
    ) -> EventScopeResult<Event> {
        // An expired or purged deletion is indistinguishable from a missing
        // id: both fail with NotFound
        let idx = self
            .events
            .iter()
            .position(|e| {
                e.id == id && e.deleted_at.is_some_and(|d| !retention::is_expired(d, now))
            })
            .ok_or_else(|| EventScopeError::NotFound(id.to_string()))?;

        let previous = self.events[idx].deleted_at.take();

        if let Err(e) = self.persist() {
            self.events[idx].deleted_at = previous;
            return Err(e);
        }
        Ok(self.events[idx].clone())
    }

    /// Remove an event outright. Removing an id that is already gone is a
    /// no-op: a user purge and the sweeper may race on the same id.
    pub fn purge(&mut self, id: &str) -> EventScopeResult<Option<Event>> {
        let Some(idx) = self.events.iter().position(|e| e.id == id) else {
            return Ok(None);
        };

        let removed = self.events.remove(idx);

        if let Err(e) = self.persist() {
            self.events.insert(idx, removed);
            return Err(e);
        }
        Ok(Some(removed))
    }

    /// Record the external calendar id returned by a successful mirror
    /// create. Best-effort secondary write: the event may already be gone,
    /// which is not an error.
    pub fn attach_mirror_id(
        &mut self,
        id: &str,
        external_id: String,
    ) -> EventScopeResult<bool> {
        let Some(idx) = self.events.iter().position(|e| e.id == id) else {
            return Ok(false);
        };

        let previous = self.events[idx]
            .external_calendar_event_id
            .replace(external_id);

        if let Err(e) = self.persist() {
            self.events[idx].external_calendar_event_id = previous;
            return Err(e);
        }
        Ok(true)
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// All events without a deletion mark, in insertion order.
    pub fn active(&self) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| !e.is_deleted())
            .cloned()
            .collect()
    }

    /// Look up an active event. Soft-deleted events are invisible to edit
    /// and detail paths.
    pub fn active_by_id(&self, id: &str) -> EventScopeResult<&Event> {
        let idx = self.index_of_active(id)?;
        Ok(&self.events[idx])
    }

    /// Soft-deleted events still inside the recovery window, each annotated
    /// with the time left until purge.
    pub fn recoverable(&self) -> Vec<Recoverable> {
        self.recoverable_at(Utc::now())
    }

    pub(crate) fn recoverable_at(&self, now: DateTime<Utc>) -> Vec<Recoverable> {
        self.events
            .iter()
            .filter_map(|e| {
                let deleted_at = e.deleted_at?;
                if retention::is_expired(deleted_at, now) {
                    return None;
                }
                Some(Recoverable {
                    event: e.clone(),
                    remaining: retention::time_remaining(deleted_at, now),
                })
            })
            .collect()
    }

    // =========================================================================
    // Retention
    // =========================================================================

    /// Purge every soft-deleted event whose recovery window has elapsed.
    /// Active events are never touched. On a store failure the collection
    /// is restored and the error returned, so a failing pass can simply be
    /// retried on the next tick.
    pub fn sweep(&mut self) -> EventScopeResult<Vec<Event>> {
        self.sweep_at(Utc::now())
    }

    pub(crate) fn sweep_at(&mut self, now: DateTime<Utc>) -> EventScopeResult<Vec<Event>> {
        let mut kept = Vec::with_capacity(self.events.len());
        let mut purged = Vec::new();

        for event in self.events.drain(..) {
            match event.deleted_at {
                Some(deleted_at) if retention::is_expired(deleted_at, now) => {
                    purged.push(event);
                }
                _ => kept.push(event),
            }
        }
        self.events = kept;

        if purged.is_empty() {
            return Ok(purged);
        }

        if let Err(e) = self.persist() {
            self.events.extend(purged);
            return Err(e);
        }
        Ok(purged)
    }

    fn index_of_active(&self, id: &str) -> EventScopeResult<usize> {
        let idx = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| EventScopeError::NotFound(id.to_string()))?;

        if self.events[idx].is_deleted() {
            return Err(EventScopeError::InvalidState(format!(
                "event {id} is deleted; recover it first"
            )));
        }
        Ok(idx)
    }

    fn persist(&self) -> EventScopeResult<()> {
        self.store.save(&self.events)
    }
}
