//! Ticketline SDK - Rust Client Library
//!
//! Provides a typed client for the Ticketline daemon's JSON-RPC API.
//!
//! # Example
//!
//! ```no_run
//! use ticketline_sdk::TicketlineClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TicketlineClient::connect("http://127.0.0.1:9530").await?;
//!
//!     let ticket = client.create_ticket("withdraw", None).await?;
//!     println!("Your number: {}", ticket.code);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::TicketlineClient;
pub use error::{Result, SdkError};
pub use types::{
    AdvanceRequest, CompleteResponse, Contact, CreateTicketRequest, ResetResponse,
    StatsResponse, TicketIdRequest, TicketListResponse, TicketResponse, TicketView,
};
