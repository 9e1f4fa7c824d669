//! Local event store.
//!
//! The in-memory mirror of the remote calendar for the currently
//! materialized window. Exclusively owned by the engine; the presentation
//! layer only ever reads snapshots.
//!
//! Two kinds of writes exist: a window fetch replaces the whole set in
//! one assignment (never a merge), and a mutation edits exactly one key.
//! A stale fetch can therefore never half-apply.

use std::collections::HashMap;

use tracing::debug;

use calview_core::{EventRecord, TimeWindow};

/// In-memory event set keyed by remote event identity.
#[derive(Debug, Default)]
pub struct EventStore {
    window: Option<TimeWindow>,
    events: HashMap<String, EventRecord>,
}

impl EventStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole materialized set with the result of a window
    /// fetch. Always a full snapshot assignment.
    pub fn replace_window(&mut self, window: TimeWindow, events: Vec<EventRecord>) {
        let map: HashMap<String, EventRecord> = events
            .into_iter()
            .map(|event| (event.id.clone(), event))
            .collect();

        debug!(
            entries = map.len(),
            window_start = %window.start,
            window_end = %window.end,
            "replaced event window"
        );
        self.window = Some(window);
        self.events = map;
    }

    /// Inserts or replaces one event by id.
    pub fn upsert(&mut self, event: EventRecord) {
        debug!(event_id = %event.id, "upserted event");
        self.events.insert(event.id.clone(), event);
    }

    /// Removes one event by id, returning it if present.
    pub fn remove(&mut self, id: &str) -> Option<EventRecord> {
        let removed = self.events.remove(id);
        if removed.is_some() {
            debug!(event_id = id, "removed event");
        }
        removed
    }

    /// Clears the store (sign-out).
    pub fn clear(&mut self) {
        let count = self.events.len();
        self.window = None;
        self.events.clear();
        debug!(entries = count, "cleared event store");
    }

    /// Returns the event with the given id.
    pub fn get(&self, id: &str) -> Option<&EventRecord> {
        self.events.get(id)
    }

    /// Returns true if the store holds the given id.
    pub fn contains(&self, id: &str) -> bool {
        self.events.contains_key(id)
    }

    /// The window currently materialized, if any.
    pub fn window(&self) -> Option<&TimeWindow> {
        self.window.as_ref()
    }

    /// Number of events in the store.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// A snapshot of all events ordered by start time (ties broken by id)
    /// for stable presentation.
    pub fn snapshot(&self) -> Vec<EventRecord> {
        let mut events: Vec<_> = self.events.values().cloned().collect();
        events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
        events
    }
}
