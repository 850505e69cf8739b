// Ticket Store Port (Interface)

use crate::domain::{Category, Ticket, TicketId, TicketStatus};
use crate::error::Result;
use crate::port::change_feed::ChangeFeed;
use async_trait::async_trait;

/// Store interface for Ticket persistence
///
/// Orderings by `created_at` break ties by insertion order where the adapter
/// can observe it; callers must not depend on a particular tie-break.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Insert a new ticket
    async fn insert(&self, ticket: &Ticket) -> Result<()>;

    /// Find ticket by ID
    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>>;

    /// Update the mutable fields (status, counter, served_at, completed_at)
    async fn update(&self, ticket: &Ticket) -> Result<()>;

    /// Most recently created ticket of a category
    async fn latest_in_category(&self, category: Category) -> Result<Option<Ticket>>;

    /// Oldest waiting ticket across all categories
    async fn oldest_waiting(&self) -> Result<Option<Ticket>>;

    /// All tickets with `status`, oldest first
    async fn find_by_status(&self, status: TicketStatus) -> Result<Vec<Ticket>>;

    /// Every ticket, oldest first
    async fn list_all(&self) -> Result<Vec<Ticket>>;

    /// Count tickets by status
    async fn count_by_status(&self, status: TicketStatus) -> Result<i64>;

    /// Delete every ticket, returning how many were removed
    async fn clear(&self) -> Result<u64>;

    /// Subscribe to committed changes
    fn changes(&self) -> ChangeFeed;
}
