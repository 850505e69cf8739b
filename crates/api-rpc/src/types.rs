//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ticketline_core::application::QueueStats;
use ticketline_core::domain::{ContactInfo, Ticket};

/// Contact details as submitted by a kiosk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactParams {
    pub name: String,
    pub phone: String,
    pub location: String,
}

impl From<ContactParams> for ContactInfo {
    fn from(c: ContactParams) -> Self {
        ContactInfo::new(c.name, c.phone, c.location)
    }
}

impl From<ContactInfo> for ContactParams {
    fn from(c: ContactInfo) -> Self {
        Self {
            name: c.name,
            phone: c.phone,
            location: c.location,
        }
    }
}

/// Wire shape of a ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketView {
    pub id: String,
    pub code: String,
    pub category: String,
    pub category_label: String,
    pub status: String,
    pub created_at: i64,
    pub served_at: Option<i64>,
    pub completed_at: Option<i64>,
    pub counter: Option<i32>,
    pub contact: Option<ContactParams>,
}

impl From<Ticket> for TicketView {
    fn from(t: Ticket) -> Self {
        Self {
            id: t.id,
            code: t.code.as_str().to_string(),
            category: t.category.as_str().to_string(),
            category_label: t.category.label().to_string(),
            status: t.status.as_str().to_string(),
            created_at: t.created_at,
            served_at: t.served_at,
            completed_at: t.completed_at,
            counter: t.counter,
            contact: t.contact.map(ContactParams::from),
        }
    }
}

pub(crate) fn views(tickets: Vec<Ticket>) -> Vec<TicketView> {
    tickets.into_iter().map(TicketView::from).collect()
}

/// ticket.create.v1 - Take a ticket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTicketRequest {
    pub category: String,
    #[serde(default)]
    pub contact: Option<ContactParams>,
}

/// ticket.get.v1 / ticket.complete.v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketIdRequest {
    pub ticket_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteResponse {
    pub ticket_id: String,
    pub completed: bool,
}

/// queue.advance.v1 - Complete the current ticket and serve the next one
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvanceRequest {
    #[serde(default)]
    pub current_ticket_id: Option<String>,
}

/// queue.advance.v1 / queue.current.v1 result and `queue.current` notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketResponse {
    pub ticket: Option<TicketView>,
}

impl From<Option<Ticket>> for TicketResponse {
    fn from(ticket: Option<Ticket>) -> Self {
        Self {
            ticket: ticket.map(TicketView::from),
        }
    }
}

/// queue.waiting.v1 / tickets.list.v1 result and list notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketListResponse {
    pub tickets: Vec<TicketView>,
}

impl From<Vec<Ticket>> for TicketListResponse {
    fn from(tickets: Vec<Ticket>) -> Self {
        Self {
            tickets: views(tickets),
        }
    }
}

/// admin.stats.v1 - Queue statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total: i64,
    pub waiting: i64,
    pub serving: i64,
    pub completed: i64,
    pub waiting_by_category: BTreeMap<String, i64>,
    pub uptime_seconds: i64,
}

impl StatsResponse {
    pub(crate) fn new(stats: QueueStats, uptime_seconds: i64) -> Self {
        Self {
            total: stats.total,
            waiting: stats.waiting,
            serving: stats.serving,
            completed: stats.completed,
            waiting_by_category: stats
                .waiting_by_category
                .into_iter()
                .map(|(category, count)| (category.as_str().to_string(), count))
                .collect(),
            uptime_seconds,
        }
    }
}

/// admin.reset.v1 - Delete every ticket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetResponse {
    pub deleted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketline_core::domain::Category;

    #[test]
    fn test_ticket_view_carries_label_and_contact() {
        let ticket = Ticket::new(
            "id-1",
            1_000,
            Category::LoanReleasing,
            3,
            Some(ContactInfo::new("Ana", "0917", "Cebu")),
        );

        let view = TicketView::from(ticket);
        assert_eq!(view.code, "LR03");
        assert_eq!(view.category, "loan-releasing");
        assert_eq!(view.category_label, "Loan Releasing");
        assert_eq!(view.status, "waiting");
        assert_eq!(view.contact.map(|c| c.name), Some("Ana".to_string()));
    }

    #[test]
    fn test_advance_request_defaults() {
        let req: AdvanceRequest = serde_json::from_str("{}").unwrap();
        assert!(req.current_ticket_id.is_none());
    }
}
