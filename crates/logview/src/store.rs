use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use eim_types::{now_ms, LogLevel};

/// Maximum number of retained log entries. Older entries are evicted first.
pub const MAX_ENTRIES: usize = 1000;

/// One installation log line. Immutable once created; owned exclusively by
/// the [`LogStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Monotonic id assigned by the store within one lifecycle.
    pub id: u64,
    pub level: LogLevel,
    pub text: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Ring-bounded buffer of log entries, newest at index 0.
///
/// Insertion order is reverse chronological, matching the log viewer which
/// renders the newest line on top. Length never exceeds [`MAX_ENTRIES`].
#[derive(Debug, Clone, Default)]
pub struct LogStore {
    entries: VecDeque<LogEntry>,
    next_id: u64,
}

impl LogStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_ENTRIES),
            next_id: 0,
        }
    }

    /// Append a new entry at the front, evicting the oldest entry once the
    /// cap is exceeded. O(1) amortized.
    pub fn append(&mut self, level: LogLevel, text: impl Into<String>) -> &LogEntry {
        self.append_at(level, text, now_ms())
    }

    /// Append with an explicit timestamp (the event delivery time).
    pub fn append_at(&mut self, level: LogLevel, text: impl Into<String>, timestamp: i64) -> &LogEntry {
        let entry = LogEntry {
            id: self.next_id,
            level,
            text: text.into(),
            timestamp,
        };
        self.next_id += 1;

        if self.entries.len() >= MAX_ENTRIES {
            self.entries.pop_back();
        }
        self.entries.push_front(entry);
        &self.entries[0]
    }

    /// Drop all entries and restart ids. A cleared store is a new lifecycle.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_id = 0;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index` (0 = newest), if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LogEntry> {
        self.entries.get(index)
    }

    /// Copy of the entries in `[start, end)`, clamped to bounds.
    ///
    /// Out-of-range input yields a truncated or empty slice instead of an
    /// error: this runs on every scroll frame.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> Vec<LogEntry> {
        let len = self.entries.len();
        let start = start.min(len);
        let end = end.min(len);
        if start >= end {
            return Vec::new();
        }
        self.entries.range(start..end).cloned().collect()
    }
}
