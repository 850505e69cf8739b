//! JSON-RPC Server
//!
//! Serves JSON-RPC 2.0 over HTTP and WebSocket on one TCP port.

use crate::handler::RpcHandler;
use crate::types::{
    AdvanceRequest, CreateTicketRequest, TicketIdRequest, TicketListResponse, TicketResponse,
};
use jsonrpsee::core::SubscriptionResult;
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::types::{ErrorObjectOwned, Params};
use jsonrpsee::{PendingSubscriptionSink, RpcModule, SubscriptionMessage};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use ticketline_core::application::{LiveProjections, QueueService};
use tokio::sync::watch;
use tracing::{debug, info};

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9530;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(
        config: RpcServerConfig,
        service: Arc<QueueService>,
        projections: Arc<LiveProjections>,
    ) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(service, projections)),
        }
    }

    /// Start the JSON-RPC server, returning the bound address and its handle
    ///
    /// Binds to the configured host only; the default is localhost.
    pub async fn start(self) -> Result<(SocketAddr, ServerHandle), String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;
        let local_addr = server
            .local_addr()
            .map_err(|e| format!("Failed to read bound address: {}", e))?;

        let module = self.build_module().map_err(|e| e.to_string())?;
        let handle = server.start(module);

        info!(addr = %local_addr, "JSON-RPC server started (HTTP + WebSocket)");
        Ok((local_addr, handle))
    }

    /// Register every method and subscription on a fresh module
    pub fn build_module(&self) -> Result<RpcModule<()>, jsonrpsee::core::RegisterMethodError> {
        let mut module = RpcModule::new(());

        let handler = self.handler.clone();
        module.register_async_method("ticket.create.v1", move |params, _, _| {
            let handler = handler.clone();
            async move {
                let req: CreateTicketRequest = parse_params(params)?;
                handler.create_ticket(req).await
            }
        })?;

        let handler = self.handler.clone();
        module.register_async_method("ticket.get.v1", move |params, _, _| {
            let handler = handler.clone();
            async move {
                let req: TicketIdRequest = parse_params(params)?;
                handler.get_ticket(req).await
            }
        })?;

        let handler = self.handler.clone();
        module.register_async_method("ticket.complete.v1", move |params, _, _| {
            let handler = handler.clone();
            async move {
                let req: TicketIdRequest = parse_params(params)?;
                handler.complete_ticket(req).await
            }
        })?;

        let handler = self.handler.clone();
        module.register_async_method("queue.advance.v1", move |params, _, _| {
            let handler = handler.clone();
            async move {
                let req: AdvanceRequest = parse_optional_params(params)?;
                handler.advance(req).await
            }
        })?;

        let handler = self.handler.clone();
        module.register_async_method("queue.current.v1", move |_, _, _| {
            let handler = handler.clone();
            async move { handler.current().await }
        })?;

        let handler = self.handler.clone();
        module.register_async_method("queue.waiting.v1", move |_, _, _| {
            let handler = handler.clone();
            async move { handler.waiting().await }
        })?;

        let handler = self.handler.clone();
        module.register_async_method("tickets.list.v1", move |_, _, _| {
            let handler = handler.clone();
            async move { handler.list().await }
        })?;

        // Admin APIs
        let handler = self.handler.clone();
        module.register_async_method("admin.stats.v1", move |_, _, _| {
            let handler = handler.clone();
            async move { handler.stats().await }
        })?;

        let handler = self.handler.clone();
        module.register_async_method("admin.reset.v1", move |_, _, _| {
            let handler = handler.clone();
            async move { handler.reset().await }
        })?;

        // Live subscriptions (WebSocket only)
        let projections = self.handler.projections().clone();
        module.register_subscription(
            "queue.subscribe_current.v1",
            "queue.current",
            "queue.unsubscribe_current.v1",
            move |_, pending, _, _| {
                let rx = projections.watch_current();
                async move { forward(pending, rx, TicketResponse::from).await }
            },
        )?;

        let projections = self.handler.projections().clone();
        module.register_subscription(
            "queue.subscribe_waiting.v1",
            "queue.waiting",
            "queue.unsubscribe_waiting.v1",
            move |_, pending, _, _| {
                let rx = projections.watch_waiting();
                async move { forward(pending, rx, TicketListResponse::from).await }
            },
        )?;

        let projections = self.handler.projections().clone();
        module.register_subscription(
            "tickets.subscribe_all.v1",
            "tickets.all",
            "tickets.unsubscribe_all.v1",
            move |_, pending, _, _| {
                let rx = projections.watch_all();
                async move { forward(pending, rx, TicketListResponse::from).await }
            },
        )?;

        Ok(module)
    }
}

/// Accept `{..}` (named) or `[{..}]` (single positional object)
fn parse_params<T: DeserializeOwned>(params: Params<'_>) -> Result<T, ErrorObjectOwned> {
    if params.is_object() {
        params.parse()
    } else {
        params.one()
    }
}

/// Like `parse_params`, but absent params mean the default request
fn parse_optional_params<T>(params: Params<'_>) -> Result<T, ErrorObjectOwned>
where
    T: DeserializeOwned + Default,
{
    match params.as_str() {
        None => Ok(T::default()),
        Some(raw) if raw.trim() == "[]" => Ok(T::default()),
        Some(_) => parse_params(params),
    }
}

/// Push the current projection value, then every change, until the client leaves
async fn forward<T, V, F>(
    pending: PendingSubscriptionSink,
    mut rx: watch::Receiver<T>,
    to_view: F,
) -> SubscriptionResult
where
    T: Clone,
    V: Serialize,
    F: Fn(T) -> V,
{
    let sink = pending.accept().await?;
    debug!(subscription = ?sink.subscription_id(), "Subscriber joined");

    loop {
        let value = to_view(rx.borrow_and_update().clone());
        let msg = SubscriptionMessage::from_json(&value)?;
        if sink.send(msg).await.is_err() {
            break;
        }

        tokio::select! {
            changed = rx.changed() => {
                // Projections dropped: the daemon is shutting down
                if changed.is_err() {
                    break;
                }
            }
            _ = sink.closed() => break,
        }
    }

    debug!(subscription = ?sink.subscription_id(), "Subscriber left");
    Ok(())
}
