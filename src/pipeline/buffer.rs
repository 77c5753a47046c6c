//! A bounded, newest-first store of recent alerts.

use std::collections::HashSet;

use crate::models::{Alert, AlertIdentity};

/// An ordered, capacity-bounded store of the most recent alerts.
///
/// The buffer is the single shared mutable resource of the pipeline. It is
/// kept sorted newest-first by timestamp, with ties broken by arrival
/// order, and never holds two alerts with the same identity. Insertion
/// beyond capacity evicts the oldest entries.
#[derive(Debug)]
pub struct AlertBuffer {
    capacity: usize,
    entries: Vec<Alert>,
}

impl AlertBuffer {
    /// Creates an empty buffer with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity, entries: Vec::new() }
    }

    /// Merges new alerts into the buffer.
    ///
    /// Alerts whose identity is already present are ignored, so admitting
    /// the same batch twice is a no-op. Returns the number of alerts
    /// actually inserted.
    pub fn admit(&mut self, new_alerts: Vec<Alert>) -> usize {
        let mut known = self.known_identities();
        let mut inserted = 0;
        for alert in new_alerts {
            if !known.insert(alert.identity()) {
                continue;
            }
            self.entries.push(alert);
            inserted += 1;
        }
        if inserted > 0 {
            // Stable sort: on equal timestamps, earlier-admitted alerts stay
            // ahead of later ones.
            self.entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            self.entries.truncate(self.capacity);
        }
        inserted
    }

    /// Returns an owned copy of the current ordered view, newest first.
    pub fn snapshot(&self) -> Vec<Alert> {
        self.entries.clone()
    }

    /// Returns the identities currently held, for deduplication of the next
    /// batch.
    pub fn known_identities(&self) -> HashSet<AlertIdentity> {
        self.entries.iter().map(Alert::identity).collect()
    }

    /// Number of alerts currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
