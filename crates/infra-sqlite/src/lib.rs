// Ticketline Infrastructure - SQLite Adapter
// Implements: TicketStore, TransactionalTicketStore

mod connection;
mod migration;
mod queries;
mod ticket_store;
mod transaction;

pub use connection::create_pool;
pub use migration::run_migrations;
pub use ticket_store::SqliteTicketStore;
pub use transaction::SqliteTicketTransaction;

// Note: sqlx::Error conversion is handled by map_sqlx_error
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
