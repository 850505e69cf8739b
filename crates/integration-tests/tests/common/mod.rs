//! Wiring shared by the integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use ticketline_core::application::QueueService;
use ticketline_core::domain::{QueueConfig, Ticket};
use ticketline_core::port::{TimeProvider, UuidProvider};
use ticketline_infra_memory::MemoryTicketStore;
use ticketline_infra_sqlite::{create_pool, run_migrations, SqliteTicketStore};

/// Clock that advances one second per reading
pub struct StepClock {
    next: AtomicI64,
}

impl StepClock {
    pub fn starting_at(millis: i64) -> Self {
        Self {
            next: AtomicI64::new(millis),
        }
    }
}

impl Default for StepClock {
    fn default() -> Self {
        Self::starting_at(1_700_000_000_000)
    }
}

impl TimeProvider for StepClock {
    fn now_millis(&self) -> i64 {
        self.next.fetch_add(1000, Ordering::SeqCst)
    }
}

pub fn memory_service(config: QueueConfig) -> (Arc<QueueService>, Arc<MemoryTicketStore>) {
    let store = Arc::new(MemoryTicketStore::new());
    let service = QueueService::new(
        store.clone(),
        store.clone(),
        Arc::new(UuidProvider),
        Arc::new(StepClock::default()),
        config,
    );
    (Arc::new(service), store)
}

pub async fn sqlite_store(url: &str) -> Arc<SqliteTicketStore> {
    let pool = create_pool(url).await.expect("pool");
    run_migrations(&pool).await.expect("migrations");
    Arc::new(SqliteTicketStore::new(pool))
}

pub fn service_over(
    store: Arc<SqliteTicketStore>,
    clock: StepClock,
    config: QueueConfig,
) -> Arc<QueueService> {
    Arc::new(QueueService::new(
        store.clone(),
        store,
        Arc::new(UuidProvider),
        Arc::new(clock),
        config,
    ))
}

pub fn codes(tickets: &[Ticket]) -> Vec<String> {
    tickets.iter().map(|t| t.code.as_str().to_string()).collect()
}
