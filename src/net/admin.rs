//! `/admin/*` endpoints. The server enforces the admin role; the client only
//! hides these screens from other roles.

use serde_json::json;

use super::api::{ApiClient, QueryParams};
use super::error::ApiError;
use super::transport::Method;
use super::types::{
    Ack, AdminStats, AdminUser, AdminUserListPayload, AdminUserPayload, CreateUserData, Envelope, Role,
    SortOrder, StatsPayload, UpdateUserData, UserStatus,
};

/// Query for `GET /admin/users`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdminUserFilters {
    pub search: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl AdminUserFilters {
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut q = QueryParams::new();
        q.push("search", self.search.as_deref())
            .push("role", self.role.map(Role::as_str))
            .push("status", self.status.map(UserStatus::as_str))
            .push_number("page", self.page)
            .push_number("limit", self.limit)
            .push("sort_by", self.sort_by.as_deref())
            .push("sort_order", self.sort_order.map(SortOrder::as_str));
        q
    }
}

fn user_path(id: &str) -> String {
    format!("/admin/users/{id}")
}

impl ApiClient {
    /// `GET /admin/stats`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn admin_stats(&self) -> Result<Option<AdminStats>, ApiError> {
        let env: Envelope<StatsPayload<AdminStats>> = self.get("/admin/stats").await?;
        Ok(env.payload.stats)
    }

    /// `GET /admin/users`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn list_users(&self, filters: &AdminUserFilters) -> Result<Envelope<AdminUserListPayload>, ApiError> {
        self.get_with_query("/admin/users", filters.to_query()).await
    }

    /// `GET /admin/users/:id`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn get_user(&self, id: &str) -> Result<Option<AdminUser>, ApiError> {
        let env: Envelope<AdminUserPayload> = self.get(user_path(id)).await?;
        Ok(env.payload.user)
    }

    /// `POST /admin/users`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn create_user(&self, data: &CreateUserData) -> Result<Envelope<AdminUserPayload>, ApiError> {
        self.send_json(Method::Post, "/admin/users", data).await
    }

    /// `PUT /admin/users/:id`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn update_user(&self, id: &str, data: &UpdateUserData) -> Result<Envelope<AdminUserPayload>, ApiError> {
        self.send_json(Method::Put, user_path(id), data).await
    }

    /// `DELETE /admin/users/:id`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn delete_user(&self, id: &str) -> Result<Envelope<Ack>, ApiError> {
        self.send_empty(Method::Delete, user_path(id)).await
    }

    /// `PATCH /admin/users/:id/role`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn change_user_role(&self, id: &str, role: Role) -> Result<Envelope<Ack>, ApiError> {
        self.send_json(Method::Patch, format!("{}/role", user_path(id)), &json!({ "role": role }))
            .await
    }
}
