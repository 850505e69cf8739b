//! SDK Request/Response Types
//!
//! Mirrors the JSON-RPC types from the api-rpc crate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Contact details attached to a ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
    pub location: String,
}

impl Contact {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            location: location.into(),
        }
    }
}

/// A ticket as returned by the daemon
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
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
    pub contact: Option<Contact>,
}

/// Request to take a ticket
#[derive(Debug, Clone, Serialize)]
pub struct CreateTicketRequest {
    pub category: String,
    pub contact: Option<Contact>,
}

/// Request naming one ticket
#[derive(Debug, Clone, Serialize)]
pub struct TicketIdRequest {
    pub ticket_id: String,
}

/// Response from complete operation
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteResponse {
    pub ticket_id: String,
    pub completed: bool,
}

/// Request to advance the queue
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdvanceRequest {
    pub current_ticket_id: Option<String>,
}

/// Zero or one ticket (advance, current)
#[derive(Debug, Clone, Deserialize)]
pub struct TicketResponse {
    pub ticket: Option<TicketView>,
}

/// Ticket list (waiting, list)
#[derive(Debug, Clone, Deserialize)]
pub struct TicketListResponse {
    pub tickets: Vec<TicketView>,
}

/// Queue statistics
#[derive(Debug, Clone, Deserialize)]
pub struct StatsResponse {
    pub total: i64,
    pub waiting: i64,
    pub serving: i64,
    pub completed: i64,
    pub waiting_by_category: BTreeMap<String, i64>,
    pub uptime_seconds: i64,
}

/// Response from reset operation
#[derive(Debug, Clone, Deserialize)]
pub struct ResetResponse {
    pub deleted: u64,
}
