// Ticketline Infrastructure - In-Memory Adapter
// Implements: TicketStore, TransactionalTicketStore

mod store;
mod transaction;

pub use store::MemoryTicketStore;
pub use transaction::MemoryTicketTransaction;
