//! RPC Method Handlers
//!
//! Translates JSON-RPC parameters into queue service calls.

use crate::error::to_rpc_error;
use crate::types::{
    views, AdvanceRequest, CompleteResponse, CreateTicketRequest, ResetResponse, StatsResponse,
    TicketIdRequest, TicketListResponse, TicketResponse, TicketView,
};
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use std::time::Instant;
use ticketline_core::application::{LiveProjections, QueueService};
use ticketline_core::domain::{Category, ContactInfo, TicketId};
use ticketline_core::error::AppError;
use tracing::warn;

type RpcResult<T> = Result<T, ErrorObjectOwned>;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: Arc<QueueService>,
    projections: Arc<LiveProjections>,
    start_time: Instant,
}

impl RpcHandler {
    pub fn new(service: Arc<QueueService>, projections: Arc<LiveProjections>) -> Self {
        Self {
            service,
            projections,
            start_time: Instant::now(),
        }
    }

    pub fn projections(&self) -> &Arc<LiveProjections> {
        &self.projections
    }

    /// ticket.create.v1
    pub async fn create_ticket(&self, params: CreateTicketRequest) -> RpcResult<TicketView> {
        let category: Category = params
            .category
            .trim()
            .parse()
            .map_err(|e: ticketline_core::domain::DomainError| to_rpc_error(e.into()))?;

        let contact = match params.contact {
            Some(contact) => {
                let contact = ContactInfo::from(contact);
                contact.validate().map_err(|e| to_rpc_error(e.into()))?;
                Some(contact)
            }
            None => None,
        };

        let ticket = self
            .service
            .create_ticket(category, contact)
            .await
            .map_err(to_rpc_error)?;

        Ok(ticket.into())
    }

    /// ticket.get.v1
    pub async fn get_ticket(&self, params: TicketIdRequest) -> RpcResult<TicketView> {
        let id = required_id(params.ticket_id)?;
        let ticket = self.service.get_ticket(&id).await.map_err(to_rpc_error)?;
        Ok(ticket.into())
    }

    /// ticket.complete.v1
    pub async fn complete_ticket(&self, params: TicketIdRequest) -> RpcResult<CompleteResponse> {
        let id = required_id(params.ticket_id)?;
        self.service
            .complete_ticket(&id)
            .await
            .map_err(to_rpc_error)?;

        Ok(CompleteResponse {
            ticket_id: id,
            completed: true,
        })
    }

    /// queue.advance.v1
    pub async fn advance(&self, params: AdvanceRequest) -> RpcResult<TicketResponse> {
        let current = params
            .current_ticket_id
            .map(required_id)
            .transpose()?;

        let next = self
            .service
            .advance_queue(current.as_ref())
            .await
            .map_err(to_rpc_error)?;

        Ok(next.into())
    }

    /// queue.current.v1
    pub async fn current(&self) -> RpcResult<TicketResponse> {
        let current = self.service.current_ticket().await.map_err(to_rpc_error)?;
        Ok(current.into())
    }

    /// queue.waiting.v1
    pub async fn waiting(&self) -> RpcResult<TicketListResponse> {
        let waiting = self.service.waiting_list().await.map_err(to_rpc_error)?;
        Ok(TicketListResponse {
            tickets: views(waiting),
        })
    }

    /// tickets.list.v1
    pub async fn list(&self) -> RpcResult<TicketListResponse> {
        let all = self.service.all_tickets().await.map_err(to_rpc_error)?;
        Ok(all.into())
    }

    /// admin.stats.v1
    pub async fn stats(&self) -> RpcResult<StatsResponse> {
        let stats = self.service.stats().await.map_err(to_rpc_error)?;
        Ok(StatsResponse::new(
            stats,
            self.start_time.elapsed().as_secs() as i64,
        ))
    }

    /// admin.reset.v1
    pub async fn reset(&self) -> RpcResult<ResetResponse> {
        warn!("Reset requested over RPC");
        let deleted = self.service.reset_all().await.map_err(to_rpc_error)?;
        Ok(ResetResponse { deleted })
    }
}

fn required_id(id: String) -> RpcResult<TicketId> {
    let id = id.trim().to_string();
    if id.is_empty() {
        return Err(to_rpc_error(AppError::Validation(
            "ticket_id must not be empty".to_string(),
        )));
    }
    Ok(id)
}
