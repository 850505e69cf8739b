// Transaction port for atomic read-modify-write sequences

use crate::domain::{Category, Ticket, TicketId};
use crate::error::Result;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction; change notifications fire only after this
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Transactional TicketStore operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionalTicketStore: Send + Sync {
    /// Begin a new transaction
    async fn begin_transaction(&self) -> Result<Box<dyn TicketStoreTransaction>>;
}

/// TicketStore operations within a transaction
#[async_trait]
pub trait TicketStoreTransaction: Transaction {
    /// Find ticket by ID (within transaction)
    async fn find_by_id(&mut self, id: &TicketId) -> Result<Option<Ticket>>;

    /// Latest ticket of a category (within transaction)
    async fn latest_in_category(&mut self, category: Category) -> Result<Option<Ticket>>;

    /// Oldest waiting ticket (within transaction)
    async fn oldest_waiting(&mut self) -> Result<Option<Ticket>>;

    /// Outstanding (waiting or serving) tickets holding `code` in `category`
    async fn count_outstanding_with_code(&mut self, category: Category, code: &str)
        -> Result<i64>;

    /// Insert ticket (within transaction)
    async fn insert(&mut self, ticket: &Ticket) -> Result<()>;

    /// Update ticket (within transaction)
    async fn update(&mut self, ticket: &Ticket) -> Result<()>;
}
