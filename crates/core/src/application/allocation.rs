// Ticket Allocation Use Case

use crate::domain::{Category, ContactInfo, QueueConfig, Ticket};
use crate::error::Result;
use crate::port::{IdProvider, TimeProvider, TransactionalTicketStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Create-ticket request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTicketRequest {
    pub category: Category,

    #[serde(default)]
    pub contact: Option<ContactInfo>,
}

impl CreateTicketRequest {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            contact: None,
        }
    }

    pub fn with_contact(mut self, contact: ContactInfo) -> Self {
        self.contact = Some(contact);
        self
    }
}

/// Execute allocation (read latest + insert in one transaction)
///
/// # Arguments
///
/// * `store` - Transactional ticket store
/// * `id_provider` - ID generator (injected for determinism)
/// * `time_provider` - Service clock (injected for determinism)
/// * `config` - Sequence ceiling
/// * `req` - Category and contact details
pub async fn execute(
    store: &dyn TransactionalTicketStore,
    id_provider: &dyn IdProvider,
    time_provider: &dyn TimeProvider,
    config: &QueueConfig,
    req: CreateTicketRequest,
) -> Result<Ticket> {
    let mut tx = store.begin_transaction().await?;

    let previous = match tx.latest_in_category(req.category).await? {
        None => None,
        Some(latest) => {
            let sequence = latest.sequence();
            if sequence.is_none() {
                warn!(
                    ticket_id = %latest.id,
                    code = %latest.code,
                    "Latest ticket code has no numeric suffix, restarting sequence"
                );
            }
            sequence
        }
    };

    let ticket = Ticket::new(
        id_provider.generate_id(),
        time_provider.now_millis(),
        req.category,
        config.next_sequence(previous),
        req.contact,
    );

    // Wrapped codes may still be held by customers in line
    let holders = tx
        .count_outstanding_with_code(ticket.category, ticket.code.as_str())
        .await?;
    if holders > 0 {
        warn!(
            code = %ticket.code,
            category = %ticket.category,
            outstanding = holders,
            "Ticket code reissued while an earlier holder is still queued"
        );
    }

    tx.insert(&ticket).await?;
    tx.commit().await?;

    debug!(ticket_id = %ticket.id, code = %ticket.code, "Ticket allocated");
    Ok(ticket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{FakeStore, StepClock, StepIds};
    use crate::error::AppError;
    use crate::port::transaction::MockTransactionalTicketStore;
    use crate::port::TicketStore;
    use tokio_test::{assert_err, assert_ok};

    async fn allocate(store: &FakeStore, category: Category) -> Ticket {
        execute(
            store,
            &StepIds::default(),
            &StepClock::default(),
            &QueueConfig::default(),
            CreateTicketRequest::new(category),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_first_ticket_in_category() {
        let store = FakeStore::default();
        let ticket = allocate(&store, Category::Withdraw).await;

        assert_eq!(ticket.code.as_str(), "W01");
        assert_eq!(ticket.status, crate::domain::TicketStatus::Waiting);
        assert_eq!(store.list_all().await.unwrap(), vec![ticket]);
    }

    #[tokio::test]
    async fn test_sequences_are_per_category() {
        let store = FakeStore::default();
        let ids = StepIds::default();
        let clock = StepClock::default();
        let config = QueueConfig::default();

        let mut codes = Vec::new();
        for category in [
            Category::Loan,
            Category::LoanReleasing,
            Category::Loan,
            Category::LoanReleasing,
            Category::Loan,
        ] {
            let ticket = execute(&store, &ids, &clock, &config, CreateTicketRequest::new(category))
                .await
                .unwrap();
            codes.push(ticket.code.to_string());
        }

        assert_eq!(codes, vec!["L01", "LR01", "L02", "LR02", "L03"]);
    }

    #[tokio::test]
    async fn test_wraps_after_ceiling() {
        let store = FakeStore::default();
        let ids = StepIds::default();
        let clock = StepClock::default();
        let config = QueueConfig::new(1, 3);

        let mut codes = Vec::new();
        for _ in 0..4 {
            let ticket = execute(
                &store,
                &ids,
                &clock,
                &config,
                CreateTicketRequest::new(Category::Saving),
            )
            .await
            .unwrap();
            codes.push(ticket.code.to_string());
        }

        assert_eq!(codes, vec!["S01", "S02", "S03", "S01"]);
    }

    #[tokio::test]
    async fn test_unparsable_latest_code_restarts_sequence() {
        let store = FakeStore::default();
        let mut odd = Ticket::new_test(Category::Member, 1);
        odd.code = crate::domain::TicketCode::from_raw("M-x");
        store.seed(vec![odd]);

        let ticket = allocate(&store, Category::Member).await;
        assert_eq!(ticket.code.as_str(), "M01");
    }

    #[tokio::test]
    async fn test_contact_is_kept() {
        let store = FakeStore::default();
        let contact = ContactInfo::new("Ana Cruz", "0917-555-0101", "Cebu");

        let ticket = assert_ok!(
            execute(
                &store,
                &StepIds::default(),
                &StepClock::default(),
                &QueueConfig::default(),
                CreateTicketRequest::new(Category::Insurance).with_contact(contact.clone()),
            )
            .await
        );

        assert_eq!(ticket.contact, Some(contact));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockTransactionalTicketStore::new();
        store
            .expect_begin_transaction()
            .returning(|| Err(AppError::Database("connection refused".to_string())));

        let result = execute(
            &store,
            &StepIds::default(),
            &StepClock::default(),
            &QueueConfig::default(),
            CreateTicketRequest::new(Category::Withdraw),
        )
        .await;

        let err = assert_err!(result);
        assert!(err.is_store_failure());
    }
}
