//! List sources: how each resource turns a [`FilterState`] into a page of
//! items.
//!
//! DESIGN
//! ======
//! A source is the only part of a list view that knows the resource's wire
//! query. The controller stays generic and hands the source a filter
//! snapshot; the source parses the keys it understands and ignores the rest.
//! Sources that support deletion also implement [`RemoveSource`].

use async_trait::async_trait;

use super::filters::FilterState;
use crate::net::admin::AdminUserFilters;
use crate::net::notifications::NotificationQuery;
use crate::net::tasks::TaskFilters;
use crate::net::types::{AdminUser, Class, Notification, Pagination, ParseEnumError, Task};
use crate::net::{ApiClient, ApiError};

/// Fetch failure for a list view.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid filter {key}: {source}")]
    InvalidFilter { key: &'static str, source: ParseEnumError },
    #[error("fetch interrupted: {0}")]
    Interrupted(String),
}

/// One rendered page.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Stable row identity.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Task {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for AdminUser {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Class {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Notification {
    fn key(&self) -> &str {
        &self.id
    }
}

#[async_trait]
pub trait ListSource: Send + Sync + 'static {
    type Item: Keyed + Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static;

    /// Singular noun used in banners ("Assignment deleted successfully").
    const NOUN: &'static str;

    fn api(&self) -> &ApiClient;

    async fn fetch(&self, filters: &FilterState) -> Result<Snapshot<Self::Item>, ListError>;
}

#[async_trait]
pub trait RemoveSource: ListSource {
    async fn remove(&self, key: &str) -> Result<(), ApiError>;
}

fn parse_filter<T>(filters: &FilterState, key: &'static str) -> Result<Option<T>, ListError>
where
    T: std::str::FromStr<Err = ParseEnumError>,
{
    filters
        .get(key)
        .map(str::parse)
        .transpose()
        .map_err(|source| ListError::InvalidFilter { key, source })
}

fn owned(filters: &FilterState, key: &str) -> Option<String> {
    filters.get(key).map(str::to_owned)
}

// =============================================================================
// TASKS
// =============================================================================

/// `GET /tasks` with `status, priority, search, class_id, page, limit`.
#[derive(Clone)]
pub struct TaskSource {
    api: ApiClient,
}

impl TaskSource {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Wire query for the given filter snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InvalidFilter`] for an unknown status or priority.
    pub fn query(filters: &FilterState) -> Result<TaskFilters, ListError> {
        Ok(TaskFilters {
            status: parse_filter(filters, "status")?,
            priority: parse_filter(filters, "priority")?,
            search: owned(filters, "search"),
            class_id: owned(filters, "class_id"),
            page: Some(filters.page()),
            limit: Some(filters.limit()),
        })
    }
}

#[async_trait]
impl ListSource for TaskSource {
    type Item = Task;
    const NOUN: &'static str = "Assignment";

    fn api(&self) -> &ApiClient {
        &self.api
    }

    async fn fetch(&self, filters: &FilterState) -> Result<Snapshot<Task>, ListError> {
        let query = Self::query(filters)?;
        let env = self.api.list_tasks(&query).await?;
        let pagination = env
            .payload
            .pagination
            .unwrap_or_else(|| Pagination::single(env.payload.tasks.len()));
        Ok(Snapshot { items: env.payload.tasks, pagination })
    }
}

#[async_trait]
impl RemoveSource for TaskSource {
    async fn remove(&self, key: &str) -> Result<(), ApiError> {
        self.api.delete_task(key).await.map(drop)
    }
}

// =============================================================================
// ADMIN USERS
// =============================================================================

/// `GET /admin/users` with `search, role, status, page, limit` and optional
/// `sort_by` / `sort_order`.
#[derive(Clone)]
pub struct UserSource {
    api: ApiClient,
}

impl UserSource {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns [`ListError::InvalidFilter`] for an unknown role, status or
    /// sort order.
    pub fn query(filters: &FilterState) -> Result<AdminUserFilters, ListError> {
        Ok(AdminUserFilters {
            search: owned(filters, "search"),
            role: parse_filter(filters, "role")?,
            status: parse_filter(filters, "status")?,
            page: Some(filters.page()),
            limit: Some(filters.limit()),
            sort_by: owned(filters, "sort_by"),
            sort_order: parse_filter(filters, "sort_order")?,
        })
    }
}

#[async_trait]
impl ListSource for UserSource {
    type Item = AdminUser;
    const NOUN: &'static str = "User";

    fn api(&self) -> &ApiClient {
        &self.api
    }

    async fn fetch(&self, filters: &FilterState) -> Result<Snapshot<AdminUser>, ListError> {
        let query = Self::query(filters)?;
        let env = self.api.list_users(&query).await?;
        let pagination = env
            .payload
            .pagination
            .unwrap_or_else(|| Pagination::single(env.payload.users.len()));
        Ok(Snapshot { items: env.payload.users, pagination })
    }
}

#[async_trait]
impl RemoveSource for UserSource {
    async fn remove(&self, key: &str) -> Result<(), ApiError> {
        self.api.delete_user(key).await.map(drop)
    }
}

// =============================================================================
// CLASSES
// =============================================================================

/// Where class search happens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// `search` is sent to `GET /classes` and the server filters.
    Server,
    /// The full list is fetched and filtered locally by case-insensitive
    /// substring over name, invite code and description.
    #[default]
    ClientSide,
}

/// `GET /classes`. The endpoint is unpaginated, so every snapshot is a
/// single page.
#[derive(Clone)]
pub struct ClassSource {
    api: ApiClient,
    mode: SearchMode,
}

impl ClassSource {
    #[must_use]
    pub fn new(api: ApiClient, mode: SearchMode) -> Self {
        Self { api, mode }
    }

    #[must_use]
    pub fn mode(&self) -> SearchMode {
        self.mode
    }
}

/// Case-insensitive substring match over the searchable class fields.
#[must_use]
pub fn class_matches(class: &Class, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    [Some(class.name.as_str()), Some(class.invite_code.as_str()), class.description.as_deref()]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

#[async_trait]
impl ListSource for ClassSource {
    type Item = Class;
    const NOUN: &'static str = "Class";

    fn api(&self) -> &ApiClient {
        &self.api
    }

    async fn fetch(&self, filters: &FilterState) -> Result<Snapshot<Class>, ListError> {
        let search = filters.search();
        let items = match self.mode {
            SearchMode::Server => self.api.list_classes(search).await?,
            SearchMode::ClientSide => {
                let mut classes = self.api.list_classes(None).await?;
                if let Some(needle) = search {
                    classes.retain(|c| class_matches(c, needle));
                }
                classes
            }
        };
        let pagination = Pagination::single(items.len());
        Ok(Snapshot { items, pagination })
    }
}

#[async_trait]
impl RemoveSource for ClassSource {
    async fn remove(&self, key: &str) -> Result<(), ApiError> {
        self.api.delete_class(key).await.map(drop)
    }
}

// =============================================================================
// NOTIFICATIONS
// =============================================================================

/// `GET /notifications` with `page, limit` and the `unread_only` flag
/// (filter key `unread_only`, any of `true` / `1`).
#[derive(Clone)]
pub struct NotificationSource {
    api: ApiClient,
}

impl NotificationSource {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[must_use]
    pub fn query(filters: &FilterState) -> NotificationQuery {
        NotificationQuery {
            page: Some(filters.page()),
            limit: Some(filters.limit()),
            unread_only: matches!(filters.get("unread_only"), Some("true" | "1")),
        }
    }
}

#[async_trait]
impl ListSource for NotificationSource {
    type Item = Notification;
    const NOUN: &'static str = "Notification";

    fn api(&self) -> &ApiClient {
        &self.api
    }

    async fn fetch(&self, filters: &FilterState) -> Result<Snapshot<Notification>, ListError> {
        let env = self
            .api
            .list_notifications(&Self::query(filters))
            .await?;
        let pagination = env
            .payload
            .pagination
            .unwrap_or_else(|| Pagination::single(env.payload.notifications.len()));
        Ok(Snapshot { items: env.payload.notifications, pagination })
    }
}
