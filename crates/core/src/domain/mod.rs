// Domain Layer - Pure queue rules and entities

pub mod category;
pub mod error;
pub mod queue;
pub mod ticket;

// Re-exports
pub use category::Category;
pub use error::DomainError;
pub use queue::{QueueConfig, DEFAULT_COUNTER, DEFAULT_MAX_TICKET_NUMBER};
pub use ticket::{ContactInfo, CounterId, Ticket, TicketCode, TicketId, TicketStatus};
