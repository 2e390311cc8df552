//! Command history tracking for debugging and diagnostics.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use serde::Serialize;

/// Direction of a recorded exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MessageType {
    Send,
    Receive,
}

/// A recorded command or response body.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub msg_type: MessageType,
    /// Command name, e.g. `Dimmer` for `Dimmer 40`.
    pub command: String,
    pub message: String,
    /// Seconds since history creation
    pub timestamp: f64,
}

/// Bounded log of the commands sent to one device and what came back.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    counts: HashMap<MessageType, usize>,
    last_error: Option<String>,
    start_time: Instant,
    entries: VecDeque<HistoryEntry>,
    max_entries: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHistory {
    pub const DEFAULT_MAX_ENTRIES: usize = 100;

    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
            last_error: None,
            start_time: Instant::now(),
            entries: VecDeque::new(),
            max_entries: Self::DEFAULT_MAX_ENTRIES,
        }
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            max_entries,
            ..Self::new()
        }
    }

    /// Record `message`, exchanged while running `command`.
    pub fn record(&mut self, msg_type: MessageType, command: &str, message: &str) {
        let name = command.split_whitespace().next().unwrap_or_default();
        *self.counts.entry(msg_type).or_default() += 1;

        self.entries.push_back(HistoryEntry {
            msg_type,
            command: name.to_string(),
            message: message.to_string(),
            timestamp: self.start_time.elapsed().as_secs_f64(),
        });

        if self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    pub fn record_error(&mut self, error: &str) {
        self.last_error = Some(error.to_string());
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Recorded entries, oldest first.
    pub fn entries(&self) -> &VecDeque<HistoryEntry> {
        &self.entries
    }

    /// Commands sent, oldest first.
    pub fn sent(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.msg_type == MessageType::Send)
            .map(|e| e.message.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
        self.entries.clear();
        self.last_error = None;
    }

    pub fn summary(&self) -> HistorySummary {
        let count = |t: MessageType| self.counts.get(&t).copied().unwrap_or(0);
        HistorySummary {
            send_count: count(MessageType::Send),
            receive_count: count(MessageType::Receive),
            total_entries: self.entries.len(),
            last_error: self.last_error.clone(),
        }
    }
}

/// Summary of command history for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct HistorySummary {
    pub send_count: usize,
    pub receive_count: usize,
    pub total_entries: usize,
    pub last_error: Option<String>,
}
