use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// Cap on retained entries; the oldest are dropped past this.
const LOG_CAP: usize = 500;

/// Category of a dashboard event, used to style the log panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    /// A host callback fired (click, add, contact, downline).
    Action,
    /// A viewport or filter change.
    View,
    /// Roster loading and saving.
    Roster,
    Help,
    Error,
}

/// A single timestamped entry in the dashboard event log.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub category: LogCategory,
    pub message: String,
}

/// Bounded in-memory event log shown in the dashboard's log panel.
#[derive(Debug, Default)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, category: LogCategory, message: impl Into<String>) {
        self.entries.push_back(LogEntry {
            timestamp: Utc::now(),
            category,
            message: message.into(),
        });
        if self.entries.len() > LOG_CAP {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// The most recent `n` entries, oldest-first.
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().skip(self.entries.len().saturating_sub(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_caps_at_500() {
        let mut log = EventLog::new();
        for i in 0..600 {
            log.push(LogCategory::Action, format!("entry {i}"));
        }
        assert_eq!(log.len(), 500);
        let first = log.iter().next().unwrap();
        assert_eq!(first.message, "entry 100");
    }

    #[test]
    fn test_tail_returns_most_recent() {
        let mut log = EventLog::new();
        for i in 0..10 {
            log.push(LogCategory::View, format!("e{i}"));
        }
        let tail: Vec<&str> = log.tail(3).map(|e| e.message.as_str()).collect();
        assert_eq!(tail, vec!["e7", "e8", "e9"]);
    }
}
