use std::sync::Arc;

use serde_json::Value;

use crate::error::AppResult;
use crate::http_client::{segment, ApiRequest, ApiTransport};
use crate::models::{ApiEnvelope, Notification, NotificationPage, UnreadCount};

/// Thin wrapper over the `/notifications` endpoints.
#[derive(Clone)]
pub struct NotificationService {
    transport: Arc<dyn ApiTransport>,
}

impl NotificationService {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self, page: u32, limit: u32) -> AppResult<NotificationPage> {
        let request = ApiRequest::get("/notifications")
            .query("page", page)
            .query("limit", limit);

        let value = self.transport.send(request).await?;
        let (items, pagination) = ApiEnvelope::<Vec<Notification>>::from_value(value)?.into_paged()?;

        tracing::debug!(
            "Loaded {} notifications (page {}/{})",
            items.len(),
            pagination.page,
            pagination.total_pages
        );

        Ok(NotificationPage { items, pagination })
    }

    pub async fn mark_as_read(&self, id: &str) -> AppResult<Notification> {
        let request = ApiRequest::patch(format!("/notifications/{}/read", segment(id)));
        let value = self.transport.send(request).await?;
        ApiEnvelope::<Notification>::from_value(value)?.into_data()
    }

    pub async fn mark_all_as_read(&self) -> AppResult<String> {
        let value = self
            .transport
            .send(ApiRequest::post("/notifications/mark-all-read"))
            .await?;
        ApiEnvelope::<Value>::from_value(value)?.into_message()
    }

    pub async fn get_unread_count(&self) -> AppResult<u64> {
        let value = self
            .transport
            .send(ApiRequest::get("/notifications/unread-count"))
            .await?;
        Ok(ApiEnvelope::<UnreadCount>::from_value(value)?
            .into_data()?
            .count)
    }

    pub async fn delete(&self, id: &str) -> AppResult<String> {
        let request = ApiRequest::delete(format!("/notifications/{}", segment(id)));
        let value = self.transport.send(request).await?;
        ApiEnvelope::<Value>::from_value(value)?.into_message()
    }
}
