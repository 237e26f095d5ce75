use std::collections::VecDeque;

use tracing::info;

pub const DEFAULT_MESSAGE_LOG_CAPACITY: usize = 32;

/// Receives player-facing text: dialogue, pickups, inventory listings.
pub trait LogSink {
    fn log(&mut self, message: String);
}

/// Ring of the most recent messages; the oldest line drops first.
#[derive(Debug)]
pub struct MessageLog {
    capacity: usize,
    lines: VecDeque<String>,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            lines: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn latest(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE_LOG_CAPACITY)
    }
}

impl LogSink for MessageLog {
    fn log(&mut self, message: String) {
        info!(line = %message, "dialogue");
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(message);
    }
}
