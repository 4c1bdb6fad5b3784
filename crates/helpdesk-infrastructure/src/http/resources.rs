//! Ticket and analytics endpoints used by the console.

use std::sync::Arc;

use helpdesk_core::{
    ApiError, DashboardSummary, Ticket, TicketAttachment, TicketFilter, TicketPage,
};

use super::ApiClient;

pub struct TicketsApi {
    client: Arc<ApiClient>,
}

impl TicketsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Paged list, filtered by status when one is set.
    pub async fn list(&self, filter: &TicketFilter) -> Result<TicketPage, ApiError> {
        self.client.get_with_query("/tickets", filter).await
    }

    pub async fn get(&self, id: i64) -> Result<Ticket, ApiError> {
        self.client.get(&format!("/tickets/{}", id)).await
    }

    pub async fn attach(
        &self,
        id: i64,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<TicketAttachment, ApiError> {
        self.client
            .upload(&format!("/tickets/{}/attachments", id), file_name, bytes)
            .await
    }

    pub async fn download_attachment(&self, id: i64, attachment_id: i64) -> Result<Vec<u8>, ApiError> {
        self.client
            .download(&format!("/tickets/{}/attachments/{}", id, attachment_id))
            .await
    }
}

pub struct AnalyticsApi {
    client: Arc<ApiClient>,
}

impl AnalyticsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn dashboard(&self) -> Result<DashboardSummary, ApiError> {
        self.client.get("/analytics/dashboard").await
    }
}
