//! Ticketline Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{
    AdvanceRequest, CompleteResponse, Contact, CreateTicketRequest, ResetResponse,
    StatsResponse, TicketIdRequest, TicketListResponse, TicketResponse, TicketView,
};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use std::time::Duration;

/// Ticketline Client
///
/// Request/response access to the daemon. Live updates are served over
/// WebSocket subscriptions and are not wrapped here.
///
/// # Example
///
/// ```no_run
/// use ticketline_sdk::TicketlineClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = TicketlineClient::connect("http://127.0.0.1:9530").await?;
/// # Ok(())
/// # }
/// ```
pub struct TicketlineClient {
    client: HttpClient,
}

impl TicketlineClient {
    /// Connect to the Ticketline daemon
    ///
    /// # Arguments
    ///
    /// * `url` - RPC endpoint URL (e.g., `http://127.0.0.1:9530`)
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(SdkError::InvalidUrl(url.to_string()));
        }

        let client = HttpClientBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .build(url)
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self { client })
    }

    /// Take a ticket in `category` (e.g. `"loan-releasing"`)
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use ticketline_sdk::{Contact, TicketlineClient};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = TicketlineClient::connect("http://127.0.0.1:9530").await?;
    /// let contact = Contact::new("Ana", "0917 555 0101", "Cebu");
    /// let ticket = client.create_ticket("loan", Some(contact)).await?;
    /// println!("{}", ticket.code);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_ticket(
        &self,
        category: impl Into<String>,
        contact: Option<Contact>,
    ) -> Result<TicketView> {
        let request = CreateTicketRequest {
            category: category.into(),
            contact,
        };
        let params = rpc_params![request];
        Ok(self.client.request("ticket.create.v1", params).await?)
    }

    pub async fn get_ticket(&self, ticket_id: impl Into<String>) -> Result<TicketView> {
        let params = rpc_params![TicketIdRequest {
            ticket_id: ticket_id.into(),
        }];
        Ok(self.client.request("ticket.get.v1", params).await?)
    }

    /// Complete a ticket that is being served
    pub async fn complete_ticket(&self, ticket_id: impl Into<String>) -> Result<CompleteResponse> {
        let params = rpc_params![TicketIdRequest {
            ticket_id: ticket_id.into(),
        }];
        Ok(self.client.request("ticket.complete.v1", params).await?)
    }

    /// Complete `current` (if any) and serve the oldest waiting ticket
    ///
    /// Returns `None` when nobody is waiting.
    pub async fn advance(&self, current: Option<String>) -> Result<Option<TicketView>> {
        let params = rpc_params![AdvanceRequest {
            current_ticket_id: current,
        }];
        let response: TicketResponse = self.client.request("queue.advance.v1", params).await?;
        Ok(response.ticket)
    }

    pub async fn current(&self) -> Result<Option<TicketView>> {
        let response: TicketResponse = self
            .client
            .request("queue.current.v1", rpc_params![])
            .await?;
        Ok(response.ticket)
    }

    /// Waiting tickets, oldest first
    pub async fn waiting(&self) -> Result<Vec<TicketView>> {
        let response: TicketListResponse = self
            .client
            .request("queue.waiting.v1", rpc_params![])
            .await?;
        Ok(response.tickets)
    }

    /// Every ticket, newest first
    pub async fn list(&self) -> Result<Vec<TicketView>> {
        let response: TicketListResponse = self
            .client
            .request("tickets.list.v1", rpc_params![])
            .await?;
        Ok(response.tickets)
    }

    pub async fn stats(&self) -> Result<StatsResponse> {
        Ok(self.client.request("admin.stats.v1", rpc_params![]).await?)
    }

    /// Delete every ticket. Irreversible.
    pub async fn reset(&self) -> Result<u64> {
        let response: ResetResponse = self.client.request("admin.reset.v1", rpc_params![]).await?;
        Ok(response.deleted)
    }
}
