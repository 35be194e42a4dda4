//! Wire DTOs for the classroom REST API.
//!
//! DESIGN
//! ======
//! Field names mirror the server's JSON exactly (a mix of `snake_case` and
//! camelCase), so serde attributes carry the renames instead of the callers.
//! Unknown enum values fail to decode; the API client reports that as an
//! unexpected response rather than inventing a fallback variant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// ENUMS
// =============================================================================

/// Account role. Drives route guards and which dashboards a user may open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

/// Task lifecycle status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    TaskAssigned,
    TaskCompleted,
    TaskOverdue,
    ClassJoined,
}

/// Sort direction for the admin user listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Presence status reported by the admin user listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Offline,
}

/// Error returned when parsing one of the wire enums from user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

macro_rules! wire_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            /// Wire spelling, as sent in query strings and JSON bodies.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(ParseEnumError {
                        kind: $kind,
                        value: other.to_owned(),
                        expected: concat!($($wire, " "),+),
                    }),
                }
            }
        }
    };
}

wire_enum!(Role, "role", { Student => "student", Teacher => "teacher", Admin => "admin" });
wire_enum!(TaskStatus, "status", { Todo => "todo", InProgress => "in-progress", Completed => "completed" });
wire_enum!(Priority, "priority", { Low => "low", Medium => "medium", High => "high" });
wire_enum!(UserStatus, "user status", { Active => "active", Offline => "offline" });
wire_enum!(SortOrder, "sort order", { Asc => "asc", Desc => "desc" });

// =============================================================================
// USERS
// =============================================================================

/// The authenticated identity returned by `/auth/me`, `/auth/login`, and
/// `/auth/signup`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(rename = "isVerified", default)]
    pub is_verified: bool,
}

/// A user row as managed from the admin dashboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub is_verified: bool,
    pub status: UserStatus,
    pub last_login: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Minimal `{ id, name, email }` projection used for assignee pickers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentOption {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: u64,
    pub total_students: u64,
    pub active_students: u64,
    pub instructors: u64,
    pub admins: u64,
    pub completion_rate: f64,
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub new_users_this_month: u64,
}

// =============================================================================
// TASKS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub created_by: String,
    pub assignee_id: Option<String>,
    pub class_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub assignee: Option<StudentOption>,
    #[serde(default)]
    pub creator: Option<StudentOption>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total_active: u64,
    pub pending_review: u64,
    pub todo: u64,
    pub completed: u64,
    pub total_tasks: u64,
    pub total_students: u64,
}

// =============================================================================
// CLASSES
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMemberUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMember {
    pub user_id: String,
    pub joined_at: String,
    pub user: ClassMemberUser,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub invite_code: String,
    pub teacher_id: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(rename = "memberCount", default)]
    pub member_count: Option<u64>,
    #[serde(default)]
    pub members: Option<Vec<ClassMember>>,
}

impl Class {
    /// Students among the embedded members, as assignee options.
    #[must_use]
    pub fn student_options(&self) -> Vec<StudentOption> {
        self.members
            .iter()
            .flatten()
            .filter(|m| m.user.role == Role::Student)
            .map(|m| StudentOption { id: m.user.id.clone(), name: m.user.name.clone(), email: m.user.email.clone() })
            .collect()
    }
}

// =============================================================================
// NOTIFICATIONS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub task_id: Option<String>,
    pub class_id: Option<String>,
    pub is_read: bool,
    pub created_at: String,
}

// =============================================================================
// PAGINATION + ENVELOPE
// =============================================================================

/// Server-driven pagination block attached to list responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Pagination {
    /// Placeholder shown before the first successful fetch.
    #[must_use]
    pub fn first(limit: u32) -> Self {
        Self { page: 1, limit, total: 0, total_pages: 0 }
    }

    /// Single-page pagination describing an unpaginated list of `len` items.
    #[must_use]
    pub fn single(len: usize) -> Self {
        let total = len as u64;
        let limit = u32::try_from(len).unwrap_or(u32::MAX);
        Self { page: 1, limit, total, total_pages: u32::from(len > 0) }
    }
}

/// Every response body: `{ success, message, <payload fields> }`.
#[derive(Clone, Debug, Deserialize)]
pub struct Envelope<P> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(flatten)]
    pub payload: P,
}

/// Payload for endpoints that only acknowledge.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Ack {}

#[derive(Clone, Debug, Deserialize)]
pub struct UserPayload {
    pub user: Option<User>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AdminUserPayload {
    pub user: Option<AdminUser>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AdminUserListPayload {
    #[serde(default)]
    pub users: Vec<AdminUser>,
    pub pagination: Option<Pagination>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TaskPayload {
    pub task: Option<Task>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TaskListPayload {
    #[serde(default)]
    pub tasks: Vec<Task>,
    pub pagination: Option<Pagination>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StatsPayload<S> {
    pub stats: Option<S>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StudentsPayload {
    #[serde(default)]
    pub students: Vec<StudentOption>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ClassPayload {
    pub class: Option<Class>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ClassListPayload {
    #[serde(default)]
    pub classes: Vec<Class>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NotificationListPayload {
    #[serde(default)]
    pub notifications: Vec<Notification>,
    pub pagination: Option<Pagination>,
    #[serde(rename = "unreadCount")]
    pub unread_count: Option<u64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UnreadCountPayload {
    #[serde(rename = "unreadCount", default)]
    pub unread_count: u64,
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CreateTaskData {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
}

/// Partial task update.
///
/// `assignee_id` / `class_id` are tri-state: absent leaves the field alone,
/// `Some(None)` clears it (serialized as `null`), `Some(Some(id))` sets it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UpdateTaskData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<Option<String>>,
}

impl UpdateTaskData {
    /// Update touching only the status field.
    #[must_use]
    pub fn status(status: TaskStatus) -> Self {
        Self { status: Some(status), ..Self::default() }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ClassData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreateUserData {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UpdateUserData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
