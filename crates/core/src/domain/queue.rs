// Queue Domain Model

use crate::domain::ticket::CounterId;

/// Counter that serves tickets when none is configured (single-counter branch)
pub const DEFAULT_COUNTER: CounterId = 1;

/// Highest sequence number before a category's codes wrap back to 1
pub const DEFAULT_MAX_TICKET_NUMBER: u32 = 50;

/// Queue configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Counter recorded on tickets when they start being served
    pub counter: CounterId,
    /// Sequence ceiling; codes are two digits so this stays within 1..=99
    pub max_ticket_number: u32,
}

impl QueueConfig {
    pub fn new(counter: CounterId, max_ticket_number: u32) -> Self {
        Self {
            counter,
            max_ticket_number,
        }
    }

    /// Next sequence number after `previous` (None when the category is empty)
    pub fn next_sequence(&self, previous: Option<u32>) -> u32 {
        match previous {
            Some(n) if n < self.max_ticket_number => n + 1,
            _ => 1,
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTER, DEFAULT_MAX_TICKET_NUMBER)
    }
}
