// Queue Advancement Use Cases

use crate::domain::{CounterId, Ticket, TicketId, TicketStatus};
use crate::error::{AppError, Result};
use crate::port::{TicketStoreTransaction, TimeProvider, TransactionalTicketStore};
use tracing::{debug, info};

/// Execute advance: complete `current` (if given), then serve the oldest waiting ticket.
///
/// Both steps share one transaction, so a failure while serving the next
/// ticket also rolls back the completion.
///
/// # Returns
/// The ticket now being served, or `None` when nobody is waiting
pub async fn execute(
    store: &dyn TransactionalTicketStore,
    time_provider: &dyn TimeProvider,
    counter: CounterId,
    current: Option<&TicketId>,
) -> Result<Option<Ticket>> {
    let mut tx = store.begin_transaction().await?;
    let now = time_provider.now_millis();

    if let Some(id) = current {
        complete_within(tx.as_mut(), id, now).await?;
    }

    let next = match tx.oldest_waiting().await? {
        Some(mut ticket) => {
            ticket.start_serving(counter, now)?;
            tx.update(&ticket).await?;
            Some(ticket)
        }
        None => None,
    };

    tx.commit().await?;

    match &next {
        Some(ticket) => info!(
            ticket_id = %ticket.id,
            code = %ticket.code,
            counter,
            "Now serving"
        ),
        None => debug!("No waiting tickets"),
    }
    Ok(next)
}

/// Execute complete: mark a serving ticket completed
pub async fn complete(
    store: &dyn TransactionalTicketStore,
    time_provider: &dyn TimeProvider,
    id: &TicketId,
) -> Result<()> {
    let mut tx = store.begin_transaction().await?;
    let now = time_provider.now_millis();
    complete_within(tx.as_mut(), id, now).await?;
    tx.commit().await
}

/// Completing an already completed ticket is a no-op; a waiting ticket cannot skip serving.
async fn complete_within(
    tx: &mut dyn TicketStoreTransaction,
    id: &TicketId,
    now: i64,
) -> Result<()> {
    let mut ticket = tx
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Ticket {} not found", id)))?;

    if ticket.status == TicketStatus::Completed {
        debug!(ticket_id = %id, "Ticket already completed");
        return Ok(());
    }

    ticket.complete(now)?;
    tx.update(&ticket).await?;
    debug!(ticket_id = %id, code = %ticket.code, "Ticket completed");
    Ok(())
}
