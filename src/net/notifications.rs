//! `/notifications` endpoints.

use super::api::{ApiClient, QueryParams};
use super::error::ApiError;
use super::transport::Method;
use super::types::{Ack, Envelope, NotificationListPayload, UnreadCountPayload};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NotificationQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub unread_only: bool,
}

impl NotificationQuery {
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut q = QueryParams::new();
        q.push_number("page", self.page)
            .push_number("limit", self.limit)
            .push_flag("unread_only", self.unread_only);
        q
    }
}

impl ApiClient {
    /// `GET /notifications`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn list_notifications(
        &self,
        query: &NotificationQuery,
    ) -> Result<Envelope<NotificationListPayload>, ApiError> {
        self.get_with_query("/notifications", query.to_query())
            .await
    }

    /// `GET /notifications/unread-count`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn unread_count(&self) -> Result<u64, ApiError> {
        let env: Envelope<UnreadCountPayload> = self.get("/notifications/unread-count").await?;
        Ok(env.payload.unread_count)
    }

    /// `PUT /notifications/:id/read`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn mark_notification_read(&self, id: &str) -> Result<Envelope<Ack>, ApiError> {
        self.send_empty(Method::Put, format!("/notifications/{id}/read"))
            .await
    }

    /// `PUT /notifications/read-all`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn mark_all_notifications_read(&self) -> Result<Envelope<Ack>, ApiError> {
        self.send_empty(Method::Put, "/notifications/read-all").await
    }

    /// `POST /notifications/check-overdue`. Asks the server to emit
    /// `task_overdue` notifications for past-due tasks.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn check_overdue(&self) -> Result<Envelope<Ack>, ApiError> {
        self.send_empty(Method::Post, "/notifications/check-overdue")
            .await
    }
}
