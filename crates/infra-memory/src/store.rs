// In-Memory TicketStore Implementation

use crate::MemoryTicketTransaction;
use async_trait::async_trait;
use std::sync::Arc;
use ticketline_core::domain::{Category, Ticket, TicketId, TicketStatus};
use ticketline_core::error::{AppError, Result};
use ticketline_core::port::{
    ChangeEvent, ChangeFeed, ChangeNotifier, TicketStore, TicketStoreTransaction,
    TransactionalTicketStore,
};
use tokio::sync::Mutex;
use tracing::debug;

/// Tickets in insertion order; insertion order breaks `created_at` ties
pub(crate) type Tickets = Vec<Ticket>;

/// Ticket store held entirely in process memory.
///
/// Writers are serialized by one async mutex, so transactions are isolated:
/// a transaction owns the lock from `begin_transaction` until commit or drop.
#[derive(Clone, Default)]
pub struct MemoryTicketStore {
    tickets: Arc<Mutex<Tickets>>,
    notifier: ChangeNotifier,
}

impl MemoryTicketStore {
    pub fn new() -> Self {
        Self::default()
    }
}

pub(crate) fn latest_in_category(tickets: &Tickets, category: Category) -> Option<Ticket> {
    // max_by_key keeps the last maximum, so the last inserted ticket wins a tie
    tickets
        .iter()
        .filter(|t| t.category == category)
        .max_by_key(|t| t.created_at)
        .cloned()
}

pub(crate) fn oldest_waiting(tickets: &Tickets) -> Option<Ticket> {
    tickets
        .iter()
        .filter(|t| t.status == TicketStatus::Waiting)
        .min_by_key(|t| t.created_at)
        .cloned()
}

pub(crate) fn replace(tickets: &mut Tickets, ticket: &Ticket) -> Result<()> {
    let slot = tickets
        .iter_mut()
        .find(|t| t.id == ticket.id)
        .ok_or_else(|| AppError::NotFound(format!("Ticket {} not found", ticket.id)))?;
    *slot = ticket.clone();
    Ok(())
}

pub(crate) fn push_unique(tickets: &mut Tickets, ticket: &Ticket) -> Result<()> {
    if tickets.iter().any(|t| t.id == ticket.id) {
        return Err(AppError::Database(format!(
            "Unique constraint violation: ticket {} already exists",
            ticket.id
        )));
    }
    tickets.push(ticket.clone());
    Ok(())
}

fn sorted_oldest_first(mut tickets: Vec<Ticket>) -> Vec<Ticket> {
    tickets.sort_by_key(|t| t.created_at);
    tickets
}

#[async_trait]
impl TicketStore for MemoryTicketStore {
    async fn insert(&self, ticket: &Ticket) -> Result<()> {
        push_unique(&mut *self.tickets.lock().await, ticket)?;
        self.notifier.notify(ChangeEvent::Created(ticket.id.clone()));
        Ok(())
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>> {
        let tickets = self.tickets.lock().await;
        Ok(tickets.iter().find(|t| &t.id == id).cloned())
    }

    async fn update(&self, ticket: &Ticket) -> Result<()> {
        replace(&mut *self.tickets.lock().await, ticket)?;
        self.notifier.notify(ChangeEvent::Updated(ticket.id.clone()));
        Ok(())
    }

    async fn latest_in_category(&self, category: Category) -> Result<Option<Ticket>> {
        Ok(latest_in_category(&*self.tickets.lock().await, category))
    }

    async fn oldest_waiting(&self) -> Result<Option<Ticket>> {
        Ok(oldest_waiting(&*self.tickets.lock().await))
    }

    async fn find_by_status(&self, status: TicketStatus) -> Result<Vec<Ticket>> {
        let tickets = self.tickets.lock().await;
        let matching = tickets
            .iter()
            .filter(|t| t.status == status)
            .cloned()
            .collect();
        Ok(sorted_oldest_first(matching))
    }

    async fn list_all(&self) -> Result<Vec<Ticket>> {
        let all = self.tickets.lock().await.clone();
        Ok(sorted_oldest_first(all))
    }

    async fn count_by_status(&self, status: TicketStatus) -> Result<i64> {
        let tickets = self.tickets.lock().await;
        Ok(tickets.iter().filter(|t| t.status == status).count() as i64)
    }

    async fn clear(&self) -> Result<u64> {
        let removed = {
            let mut tickets = self.tickets.lock().await;
            let removed = tickets.len() as u64;
            tickets.clear();
            removed
        };
        debug!(removed, "Cleared in-memory ticket store");
        self.notifier.notify(ChangeEvent::Cleared);
        Ok(removed)
    }

    fn changes(&self) -> ChangeFeed {
        self.notifier.subscribe()
    }
}

#[async_trait]
impl TransactionalTicketStore for MemoryTicketStore {
    async fn begin_transaction(&self) -> Result<Box<dyn TicketStoreTransaction>> {
        let guard = Arc::clone(&self.tickets).lock_owned().await;
        Ok(Box::new(MemoryTicketTransaction::new(
            guard,
            self.notifier.clone(),
        )))
    }
}
