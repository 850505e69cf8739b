// SQLite Transaction Implementation

use crate::queries;
use crate::ticket_store::map_sqlx_error;
use async_trait::async_trait;
use sqlx::{Sqlite, Transaction as SqlxTransaction};
use ticketline_core::domain::{Category, Ticket, TicketId};
use ticketline_core::error::Result;
use ticketline_core::port::{ChangeEvent, ChangeNotifier, TicketStoreTransaction, Transaction};

/// A sqlx transaction plus the change events it will publish on commit
pub struct SqliteTicketTransaction<'a> {
    tx: SqlxTransaction<'a, Sqlite>,
    notifier: ChangeNotifier,
    events: Vec<ChangeEvent>,
}

impl<'a> SqliteTicketTransaction<'a> {
    pub fn new(tx: SqlxTransaction<'a, Sqlite>, notifier: ChangeNotifier) -> Self {
        Self {
            tx,
            notifier,
            events: Vec::new(),
        }
    }
}

#[async_trait]
impl Transaction for SqliteTicketTransaction<'_> {
    async fn commit(self: Box<Self>) -> Result<()> {
        let SqliteTicketTransaction {
            tx,
            notifier,
            events,
        } = *self;
        tx.commit().await.map_err(map_sqlx_error)?;
        notifier.notify_all(events);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl TicketStoreTransaction for SqliteTicketTransaction<'_> {
    async fn find_by_id(&mut self, id: &TicketId) -> Result<Option<Ticket>> {
        queries::find_by_id(&mut *self.tx, id).await
    }

    async fn latest_in_category(&mut self, category: Category) -> Result<Option<Ticket>> {
        queries::latest_in_category(&mut *self.tx, category).await
    }

    async fn oldest_waiting(&mut self) -> Result<Option<Ticket>> {
        queries::oldest_waiting(&mut *self.tx).await
    }

    async fn count_outstanding_with_code(
        &mut self,
        category: Category,
        code: &str,
    ) -> Result<i64> {
        queries::count_outstanding_with_code(&mut *self.tx, category, code).await
    }

    async fn insert(&mut self, ticket: &Ticket) -> Result<()> {
        queries::insert(&mut *self.tx, ticket).await?;
        self.events.push(ChangeEvent::Created(ticket.id.clone()));
        Ok(())
    }

    async fn update(&mut self, ticket: &Ticket) -> Result<()> {
        queries::update(&mut *self.tx, ticket).await?;
        self.events.push(ChangeEvent::Updated(ticket.id.clone()));
        Ok(())
    }
}
