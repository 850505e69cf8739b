// Queue Service - facade over the ticketing use cases

use crate::application::advance;
use crate::application::allocation::{self, CreateTicketRequest};
use crate::application::projections::{self, QueueSnapshot};
use crate::domain::{Category, ContactInfo, QueueConfig, Ticket, TicketId, TicketStatus};
use crate::error::{AppError, Result};
use crate::port::{IdProvider, TicketStore, TimeProvider, TransactionalTicketStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Counts per status plus the waiting backlog per category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub total: i64,
    pub waiting: i64,
    pub serving: i64,
    pub completed: i64,
    pub waiting_by_category: BTreeMap<Category, i64>,
}

/// Queue Service
///
/// Store failures are logged here and returned unchanged; nothing is retried.
pub struct QueueService {
    tx_store: Arc<dyn TransactionalTicketStore>,
    store: Arc<dyn TicketStore>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
    config: QueueConfig,
}

impl QueueService {
    pub fn new(
        tx_store: Arc<dyn TransactionalTicketStore>,
        store: Arc<dyn TicketStore>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
        config: QueueConfig,
    ) -> Self {
        Self {
            tx_store,
            store,
            id_provider,
            time_provider,
            config,
        }
    }

    /// Issue a new waiting ticket for `category`
    pub async fn create_ticket(
        &self,
        category: Category,
        contact: Option<ContactInfo>,
    ) -> Result<Ticket> {
        let req = CreateTicketRequest { category, contact };
        let result = allocation::execute(
            self.tx_store.as_ref(),
            self.id_provider.as_ref(),
            self.time_provider.as_ref(),
            &self.config,
            req,
        )
        .await;

        match &result {
            Ok(ticket) => info!(
                ticket_id = %ticket.id,
                code = %ticket.code,
                category = %category,
                "Ticket created"
            ),
            Err(e) => error!(error = %e, category = %category, "Error creating ticket"),
        }
        result
    }

    /// Complete `current` (if any) and serve the oldest waiting ticket
    pub async fn advance_queue(&self, current: Option<&TicketId>) -> Result<Option<Ticket>> {
        advance::execute(
            self.tx_store.as_ref(),
            self.time_provider.as_ref(),
            self.config.counter,
            current,
        )
        .await
        .inspect_err(|e| error!(error = %e, current = ?current, "Error advancing queue"))
    }

    pub async fn complete_ticket(&self, id: &TicketId) -> Result<()> {
        advance::complete(self.tx_store.as_ref(), self.time_provider.as_ref(), id)
            .await
            .inspect_err(|e| error!(error = %e, ticket_id = %id, "Error completing ticket"))
    }

    pub async fn get_ticket(&self, id: &TicketId) -> Result<Ticket> {
        self.store
            .find_by_id(id)
            .await
            .inspect_err(|e| error!(error = %e, ticket_id = %id, "Error loading ticket"))?
            .ok_or_else(|| AppError::NotFound(format!("Ticket {} not found", id)))
    }

    /// One-shot read of all three projections
    pub async fn snapshot(&self) -> Result<QueueSnapshot> {
        let tickets = self
            .store
            .list_all()
            .await
            .inspect_err(|e| error!(error = %e, "Error reading tickets"))?;
        Ok(QueueSnapshot::from_tickets(&tickets))
    }

    pub async fn current_ticket(&self) -> Result<Option<Ticket>> {
        let serving = self
            .store
            .find_by_status(TicketStatus::Serving)
            .await
            .inspect_err(|e| error!(error = %e, "Error reading serving tickets"))?;
        Ok(projections::current_serving(&serving))
    }

    pub async fn waiting_list(&self) -> Result<Vec<Ticket>> {
        let waiting = self
            .store
            .find_by_status(TicketStatus::Waiting)
            .await
            .inspect_err(|e| error!(error = %e, "Error reading waiting tickets"))?;
        Ok(projections::waiting_list(&waiting))
    }

    pub async fn all_tickets(&self) -> Result<Vec<Ticket>> {
        Ok(self.snapshot().await?.all)
    }

    pub async fn stats(&self) -> Result<QueueStats> {
        let result = async {
            let waiting = self.store.find_by_status(TicketStatus::Waiting).await?;
            let serving = self.store.count_by_status(TicketStatus::Serving).await?;
            let completed = self.store.count_by_status(TicketStatus::Completed).await?;

            let mut waiting_by_category: BTreeMap<Category, i64> =
                Category::ALL.into_iter().map(|c| (c, 0)).collect();
            for ticket in &waiting {
                *waiting_by_category.entry(ticket.category).or_default() += 1;
            }

            let waiting = waiting.len() as i64;
            Ok::<_, AppError>(QueueStats {
                total: waiting + serving + completed,
                waiting,
                serving,
                completed,
                waiting_by_category,
            })
        }
        .await;

        result.inspect_err(|e| error!(error = %e, "Error computing queue stats"))
    }

    /// Delete every ticket. Irreversible.
    pub async fn reset_all(&self) -> Result<u64> {
        let deleted = self
            .store
            .clear()
            .await
            .inspect_err(|e| error!(error = %e, "Error resetting tickets"))?;
        warn!(deleted, "All tickets deleted");
        Ok(deleted)
    }
}
