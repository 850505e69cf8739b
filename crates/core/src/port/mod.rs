// Port Layer - Interfaces for external dependencies

pub mod change_feed;
pub mod id_provider; // For deterministic testing
pub mod ticket_store;
pub mod time_provider;
pub mod transaction;

// Re-exports
pub use change_feed::{ChangeEvent, ChangeFeed, ChangeNotifier};
pub use id_provider::{IdProvider, UuidProvider};
pub use ticket_store::TicketStore;
pub use time_provider::{SystemTimeProvider, TimeProvider};
pub use transaction::{TicketStoreTransaction, Transaction, TransactionalTicketStore};
