// In-Memory Transaction Implementation

use crate::store::{self, Tickets};
use async_trait::async_trait;
use ticketline_core::domain::{Category, Ticket, TicketId};
use ticketline_core::error::Result;
use ticketline_core::port::{ChangeEvent, ChangeNotifier, TicketStoreTransaction, Transaction};
use tokio::sync::OwnedMutexGuard;

/// Holds the store lock for its whole lifetime and stages writes on a copy.
/// Dropping without commit discards the copy, which is the rollback.
pub struct MemoryTicketTransaction {
    guard: OwnedMutexGuard<Tickets>,
    working: Tickets,
    events: Vec<ChangeEvent>,
    notifier: ChangeNotifier,
}

impl MemoryTicketTransaction {
    pub(crate) fn new(guard: OwnedMutexGuard<Tickets>, notifier: ChangeNotifier) -> Self {
        let working = guard.clone();
        Self {
            guard,
            working,
            events: Vec::new(),
            notifier,
        }
    }
}

#[async_trait]
impl Transaction for MemoryTicketTransaction {
    async fn commit(self: Box<Self>) -> Result<()> {
        let MemoryTicketTransaction {
            mut guard,
            working,
            events,
            notifier,
        } = *self;
        *guard = working;
        // Release the lock before subscribers re-read the store
        drop(guard);
        notifier.notify_all(events);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl TicketStoreTransaction for MemoryTicketTransaction {
    async fn find_by_id(&mut self, id: &TicketId) -> Result<Option<Ticket>> {
        Ok(self.working.iter().find(|t| &t.id == id).cloned())
    }

    async fn latest_in_category(&mut self, category: Category) -> Result<Option<Ticket>> {
        Ok(store::latest_in_category(&self.working, category))
    }

    async fn oldest_waiting(&mut self) -> Result<Option<Ticket>> {
        Ok(store::oldest_waiting(&self.working))
    }

    async fn count_outstanding_with_code(&mut self, category: Category, code: &str) -> Result<i64> {
        Ok(self
            .working
            .iter()
            .filter(|t| t.category == category && t.code.as_str() == code)
            .filter(|t| t.status.is_outstanding())
            .count() as i64)
    }

    async fn insert(&mut self, ticket: &Ticket) -> Result<()> {
        store::push_unique(&mut self.working, ticket)?;
        self.events.push(ChangeEvent::Created(ticket.id.clone()));
        Ok(())
    }

    async fn update(&mut self, ticket: &Ticket) -> Result<()> {
        store::replace(&mut self.working, ticket)?;
        self.events.push(ChangeEvent::Updated(ticket.id.clone()));
        Ok(())
    }
}
