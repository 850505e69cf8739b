// Ticketline Core - Domain Logic & Ports
// NO infrastructure dependencies: stores and transports live in adapter crates

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};
