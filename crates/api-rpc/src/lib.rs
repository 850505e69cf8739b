//! JSON-RPC API Layer
//!
//! Implements the JSON-RPC 2.0 server for Ticketline: request/response
//! methods over HTTP and live queue subscriptions over WebSocket.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::{RpcServer, RpcServerConfig};
