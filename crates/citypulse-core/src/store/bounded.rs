// ── Bounded newest-first logs ──

use std::collections::VecDeque;

use chrono::TimeDelta;
use serde::Serialize;

use crate::model::{Alert, FeedEntry};

/// Fixed-capacity sequence, newest entry first.
///
/// Inserting past capacity silently drops the oldest entries.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct BoundedLog<T> {
    entries: VecDeque<T>,
    #[serde(skip)]
    capacity: usize,
}

impl<T> BoundedLog<T> {
    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert at the front, then truncate to capacity. Returns how many
    /// old entries were dropped.
    pub fn prepend(&mut self, entry: T) -> usize {
        self.entries.push_front(entry);
        let overflow = self.entries.len().saturating_sub(self.capacity);
        self.entries.truncate(self.capacity);
        overflow
    }

    /// Remove every entry matching `predicate`, keeping survivors in their
    /// original order. Returns the number removed.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !predicate(e));
        before - self.entries.len()
    }

    pub fn newest(&self) -> Option<&T> {
        self.entries.front()
    }

    /// Newest first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Clone> BoundedLog<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}

// ── AlertLog ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct AlertLog(BoundedLog<Alert>);

impl AlertLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self(BoundedLog::with_capacity(capacity))
    }

    pub fn prepend(&mut self, alert: Alert) -> usize {
        self.0.prepend(alert)
    }

    /// Drop all and only `info` alerts. Returns how many were removed.
    pub fn clear_info(&mut self) -> usize {
        self.0.remove_where(Alert::is_info)
    }

    pub fn entries(&self) -> &BoundedLog<Alert> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ── FeedLog ─────────────────────────────────────────────────────────

/// Feed entries, strictly descending by timestamp.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct FeedLog(BoundedLog<FeedEntry>);

impl FeedLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self(BoundedLog::with_capacity(capacity))
    }

    /// Prepend an entry. A timestamp not after the current newest entry
    /// is moved to one millisecond after it.
    pub fn prepend(&mut self, mut entry: FeedEntry) -> usize {
        if let Some(newest) = self.0.newest() {
            if entry.timestamp <= newest.timestamp {
                entry.timestamp = newest.timestamp + TimeDelta::milliseconds(1);
            }
        }
        self.0.prepend(entry)
    }

    pub fn entries(&self) -> &BoundedLog<FeedEntry> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
