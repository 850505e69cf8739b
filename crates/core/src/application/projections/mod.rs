// Queue projections: read-only views derived from the full ticket set

mod live;

pub use live::{LiveProjections, Subscription};

use crate::domain::{Ticket, TicketStatus};
use serde::{Deserialize, Serialize};

/// Ticket being served; with several serving tickets the most recent wins
pub fn current_serving(tickets: &[Ticket]) -> Option<Ticket> {
    tickets
        .iter()
        .filter(|t| t.status == TicketStatus::Serving)
        .max_by_key(|t| t.created_at)
        .cloned()
}

/// Waiting tickets, oldest first
pub fn waiting_list(tickets: &[Ticket]) -> Vec<Ticket> {
    let mut waiting: Vec<Ticket> = tickets
        .iter()
        .filter(|t| t.status == TicketStatus::Waiting)
        .cloned()
        .collect();
    waiting.sort_by_key(|t| t.created_at);
    waiting
}

/// Every ticket, newest first
pub fn all_tickets(tickets: &[Ticket]) -> Vec<Ticket> {
    let mut all = tickets.to_vec();
    all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    all
}

/// The three projections computed from one read of the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub current: Option<Ticket>,
    pub waiting: Vec<Ticket>,
    pub all: Vec<Ticket>,
}

impl QueueSnapshot {
    pub fn from_tickets(tickets: &[Ticket]) -> Self {
        Self {
            current: current_serving(tickets),
            waiting: waiting_list(tickets),
            all: all_tickets(tickets),
        }
    }
}
