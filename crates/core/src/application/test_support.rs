// Test doubles shared by the application unit tests

use crate::domain::{Category, Ticket, TicketId, TicketStatus};
use crate::error::Result;
use crate::port::{
    ChangeEvent, ChangeFeed, ChangeNotifier, IdProvider, TicketStore, TicketStoreTransaction,
    TimeProvider, Transaction, TransactionalTicketStore,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Clock that advances one second per reading
pub struct StepClock {
    next: AtomicI64,
}

impl Default for StepClock {
    fn default() -> Self {
        Self {
            next: AtomicI64::new(1_700_000_000_000),
        }
    }
}

impl TimeProvider for StepClock {
    fn now_millis(&self) -> i64 {
        self.next.fetch_add(1000, Ordering::SeqCst)
    }
}

/// IDs `t-1`, `t-2`, ...
#[derive(Default)]
pub struct StepIds {
    next: AtomicU64,
}

impl IdProvider for StepIds {
    fn generate_id(&self) -> String {
        format!("t-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

fn oldest_waiting(tickets: &[Ticket]) -> Option<Ticket> {
    tickets
        .iter()
        .filter(|t| t.status == TicketStatus::Waiting)
        .min_by_key(|t| t.created_at)
        .cloned()
}

fn latest_in_category(tickets: &[Ticket], category: Category) -> Option<Ticket> {
    tickets
        .iter()
        .filter(|t| t.category == category)
        .max_by_key(|t| t.created_at)
        .cloned()
}

/// Vec-backed store; transactions work on a copy written back on commit
#[derive(Default, Clone)]
pub struct FakeStore {
    tickets: Arc<Mutex<Vec<Ticket>>>,
    notifier: ChangeNotifier,
}

impl FakeStore {
    pub fn seed(&self, tickets: Vec<Ticket>) {
        self.tickets.lock().unwrap().extend(tickets);
    }

    pub fn snapshot(&self) -> Vec<Ticket> {
        self.tickets.lock().unwrap().clone()
    }
}

#[async_trait]
impl TicketStore for FakeStore {
    async fn insert(&self, ticket: &Ticket) -> Result<()> {
        self.tickets.lock().unwrap().push(ticket.clone());
        self.notifier.notify(ChangeEvent::Created(ticket.id.clone()));
        Ok(())
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>> {
        Ok(self.snapshot().into_iter().find(|t| &t.id == id))
    }

    async fn update(&self, ticket: &Ticket) -> Result<()> {
        let mut tickets = self.tickets.lock().unwrap();
        if let Some(slot) = tickets.iter_mut().find(|t| t.id == ticket.id) {
            *slot = ticket.clone();
        }
        drop(tickets);
        self.notifier.notify(ChangeEvent::Updated(ticket.id.clone()));
        Ok(())
    }

    async fn latest_in_category(&self, category: Category) -> Result<Option<Ticket>> {
        Ok(latest_in_category(&self.snapshot(), category))
    }

    async fn oldest_waiting(&self) -> Result<Option<Ticket>> {
        Ok(oldest_waiting(&self.snapshot()))
    }

    async fn find_by_status(&self, status: TicketStatus) -> Result<Vec<Ticket>> {
        let mut found: Vec<Ticket> = self
            .snapshot()
            .into_iter()
            .filter(|t| t.status == status)
            .collect();
        found.sort_by_key(|t| t.created_at);
        Ok(found)
    }

    async fn list_all(&self) -> Result<Vec<Ticket>> {
        let mut all = self.snapshot();
        all.sort_by_key(|t| t.created_at);
        Ok(all)
    }

    async fn count_by_status(&self, status: TicketStatus) -> Result<i64> {
        Ok(self.find_by_status(status).await?.len() as i64)
    }

    async fn clear(&self) -> Result<u64> {
        let removed = std::mem::take(&mut *self.tickets.lock().unwrap()).len() as u64;
        self.notifier.notify(ChangeEvent::Cleared);
        Ok(removed)
    }

    fn changes(&self) -> ChangeFeed {
        self.notifier.subscribe()
    }
}

pub struct FakeTransaction {
    store: FakeStore,
    working: Vec<Ticket>,
    events: Vec<ChangeEvent>,
}

#[async_trait]
impl TransactionalTicketStore for FakeStore {
    async fn begin_transaction(&self) -> Result<Box<dyn TicketStoreTransaction>> {
        Ok(Box::new(FakeTransaction {
            store: self.clone(),
            working: self.snapshot(),
            events: Vec::new(),
        }))
    }
}

#[async_trait]
impl Transaction for FakeTransaction {
    async fn commit(self: Box<Self>) -> Result<()> {
        *self.store.tickets.lock().unwrap() = self.working;
        self.store.notifier.notify_all(self.events);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl TicketStoreTransaction for FakeTransaction {
    async fn find_by_id(&mut self, id: &TicketId) -> Result<Option<Ticket>> {
        Ok(self.working.iter().find(|t| &t.id == id).cloned())
    }

    async fn latest_in_category(&mut self, category: Category) -> Result<Option<Ticket>> {
        Ok(latest_in_category(&self.working, category))
    }

    async fn oldest_waiting(&mut self) -> Result<Option<Ticket>> {
        Ok(oldest_waiting(&self.working))
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
        self.working.push(ticket.clone());
        self.events.push(ChangeEvent::Created(ticket.id.clone()));
        Ok(())
    }

    async fn update(&mut self, ticket: &Ticket) -> Result<()> {
        if let Some(slot) = self.working.iter_mut().find(|t| t.id == ticket.id) {
            *slot = ticket.clone();
        }
        self.events.push(ChangeEvent::Updated(ticket.id.clone()));
        Ok(())
    }
}
