// Application Layer - Use Cases and Queue Logic

pub mod advance;
pub mod allocation;
pub mod projections;
pub mod queue_service;
pub mod shutdown;

#[cfg(test)]
mod test_support;

// Re-exports
pub use allocation::CreateTicketRequest;
pub use projections::{LiveProjections, QueueSnapshot, Subscription};
pub use queue_service::{QueueService, QueueStats};
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
