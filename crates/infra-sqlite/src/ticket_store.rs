// SQLite TicketStore Implementation

use crate::queries;
use crate::SqliteTicketTransaction;
use async_trait::async_trait;
use sqlx::SqlitePool;
use ticketline_core::domain::{Category, Ticket, TicketId, TicketStatus};
use ticketline_core::error::{AppError, Result};
use ticketline_core::port::{
    ChangeEvent, ChangeFeed, ChangeNotifier, TicketStore, TicketStoreTransaction,
    TransactionalTicketStore,
};
use tracing::debug;

// Helper to convert sqlx::Error to AppError with structured information
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "2067" | "1555" => AppError::Database(format!(
                        "Unique constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "275" => AppError::Database(format!(
                        "Check constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    // SQLITE_BUSY / SQLITE_LOCKED
                    "5" | "6" => AppError::Database(format!(
                        "Database locked ({}): {}",
                        code_str,
                        db_err.message()
                    )),
                    "13" => AppError::Database(format!("Database full: {}", db_err.message())),
                    _ => AppError::Database(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Database(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        sqlx::Error::ColumnDecode { index, source } => {
            AppError::Database(format!("Column {} could not be decoded: {}", index, source))
        }
        // Connection, pool, protocol errors
        _ => AppError::Database(err.to_string()),
    }
}

/// Durable ticket store.
///
/// Change notifications are in-process: only writes made through this
/// store (or clones of it) reach subscribers.
#[derive(Clone)]
pub struct SqliteTicketStore {
    pool: SqlitePool,
    notifier: ChangeNotifier,
}

impl SqliteTicketStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl TicketStore for SqliteTicketStore {
    async fn insert(&self, ticket: &Ticket) -> Result<()> {
        queries::insert(&self.pool, ticket).await?;
        self.notifier.notify(ChangeEvent::Created(ticket.id.clone()));
        Ok(())
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>> {
        queries::find_by_id(&self.pool, id).await
    }

    async fn update(&self, ticket: &Ticket) -> Result<()> {
        queries::update(&self.pool, ticket).await?;
        self.notifier.notify(ChangeEvent::Updated(ticket.id.clone()));
        Ok(())
    }

    async fn latest_in_category(&self, category: Category) -> Result<Option<Ticket>> {
        queries::latest_in_category(&self.pool, category).await
    }

    async fn oldest_waiting(&self) -> Result<Option<Ticket>> {
        queries::oldest_waiting(&self.pool).await
    }

    async fn find_by_status(&self, status: TicketStatus) -> Result<Vec<Ticket>> {
        queries::find_by_status(&self.pool, status).await
    }

    async fn list_all(&self) -> Result<Vec<Ticket>> {
        queries::list_all(&self.pool).await
    }

    async fn count_by_status(&self, status: TicketStatus) -> Result<i64> {
        queries::count_by_status(&self.pool, status).await
    }

    async fn clear(&self) -> Result<u64> {
        let deleted = queries::delete_all(&self.pool).await?;
        debug!(deleted, "Cleared ticket table");
        self.notifier.notify(ChangeEvent::Cleared);
        Ok(deleted)
    }

    fn changes(&self) -> ChangeFeed {
        self.notifier.subscribe()
    }
}

#[async_trait]
impl TransactionalTicketStore for SqliteTicketStore {
    async fn begin_transaction(&self) -> Result<Box<dyn TicketStoreTransaction>> {
        // Write lock up front, so concurrent writers wait on busy_timeout
        let tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteTicketTransaction::new(
            tx,
            self.notifier.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use ticketline_core::domain::ContactInfo;
    use tokio_test::assert_ok;

    async fn setup() -> SqliteTicketStore {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteTicketStore::new(pool)
    }

    fn ticket(id: &str, created_at: i64, category: Category, sequence: u32) -> Ticket {
        Ticket::new(id, created_at, category, sequence, None)
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = setup().await;
        let contact = ContactInfo::new("Ana", "0917", "Cebu");
        let t = Ticket::new("a", 1_000, Category::LoanReleasing, 4, Some(contact.clone()));

        assert_ok!(store.insert(&t).await);

        let found = store.find_by_id(&"a".to_string()).await.unwrap().unwrap();
        assert_eq!(found, t);
        assert_eq!(found.code.as_str(), "LR04");
        assert_eq!(found.contact, Some(contact));
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let store = setup().await;
        assert!(store.find_by_id(&"nope".to_string()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_is_database_error() {
        let store = setup().await;
        let t = ticket("dup", 1_000, Category::Withdraw, 1);
        store.insert(&t).await.unwrap();

        let err = store.insert(&t).await.unwrap_err();
        assert!(err.is_store_failure());
        assert!(err.to_string().contains("Unique constraint"));
    }

    #[tokio::test]
    async fn test_update_persists_transitions() {
        let store = setup().await;
        let mut t = ticket("u", 1_000, Category::Saving, 1);
        store.insert(&t).await.unwrap();

        t.start_serving(2, 2_000).unwrap();
        store.update(&t).await.unwrap();

        let found = store.find_by_id(&t.id).await.unwrap().unwrap();
        assert_eq!(found.status, TicketStatus::Serving);
        assert_eq!(found.counter, Some(2));
        assert_eq!(found.served_at, Some(2_000));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = setup().await;
        let t = ticket("ghost", 1_000, Category::Saving, 1);
        let err = store.update(&t).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_latest_in_category_breaks_ties_by_insertion() {
        let store = setup().await;
        store.insert(&ticket("l1", 5_000, Category::Loan, 1)).await.unwrap();
        store.insert(&ticket("l2", 5_000, Category::Loan, 2)).await.unwrap();
        store.insert(&ticket("w1", 9_000, Category::Withdraw, 1)).await.unwrap();

        let latest = store.latest_in_category(Category::Loan).await.unwrap().unwrap();
        assert_eq!(latest.id, "l2");
        assert!(store.latest_in_category(Category::Member).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_oldest_waiting_across_categories() {
        let store = setup().await;
        let mut served = ticket("s", 1_000, Category::Loan, 1);
        served.start_serving(1, 1_500).unwrap();
        store.insert(&served).await.unwrap();
        store.insert(&ticket("w", 3_000, Category::Withdraw, 1)).await.unwrap();
        store.insert(&ticket("i", 2_000, Category::Insurance, 1)).await.unwrap();

        let next = store.oldest_waiting().await.unwrap().unwrap();
        assert_eq!(next.id, "i");

        let waiting = store.find_by_status(TicketStatus::Waiting).await.unwrap();
        let ids: Vec<_> = waiting.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["i", "w"]);
        assert_eq!(store.count_by_status(TicketStatus::Serving).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_all_oldest_first() {
        let store = setup().await;
        store.insert(&ticket("b", 2_000, Category::Member, 1)).await.unwrap();
        store.insert(&ticket("a", 1_000, Category::Member, 2)).await.unwrap();

        let all = store.list_all().await.unwrap();
        let ids: Vec<_> = all.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_clear_notifies_and_empties() {
        let store = setup().await;
        store.insert(&ticket("x", 1_000, Category::Withdraw, 1)).await.unwrap();
        store.insert(&ticket("y", 2_000, Category::Withdraw, 2)).await.unwrap();

        let mut feed = store.changes();
        assert_eq!(store.clear().await.unwrap(), 2);
        assert_eq!(feed.recv().await.unwrap(), ChangeEvent::Cleared);
        assert!(store.list_all().await.unwrap().is_empty());
    }
}
