//! Test helpers: an in-memory transport that records every request.

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use super::api::ApiClient;
use super::transport::{ApiRequest, ApiTransport, Method, RawResponse, TransportError};

type Handler = dyn Fn(&ApiRequest) -> Result<RawResponse, TransportError> + Send + Sync;

/// Transport whose replies come from a closure; every request is recorded.
pub(crate) struct MockTransport {
    handler: Box<Handler>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub(crate) fn new(handler: impl Fn(&ApiRequest) -> Result<RawResponse, TransportError> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self { handler: Box::new(handler), requests: Mutex::new(Vec::new()) })
    }

    /// Replies `200 { success: true, message: "ok", ..payload }` to everything.
    pub(crate) fn ok(payload: Value) -> Arc<Self> {
        Self::new(move |_| Ok(ok_reply(&payload)))
    }

    /// Fails every request at the transport level.
    pub(crate) fn unreachable() -> Arc<Self> {
        Self::new(|_| Err(TransportError("connection refused".into())))
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Recorded requests matching `method` + `path`.
    pub(crate) fn count(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub(crate) fn client(self: &Arc<Self>) -> ApiClient {
        ApiClient::new(self.clone())
    }
}

#[async_trait::async_trait]
impl ApiTransport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(request.clone());
        (self.handler)(&request)
    }
}

/// `200` envelope with `payload` merged in.
pub(crate) fn ok_reply(payload: &Value) -> RawResponse {
    let mut body = json!({ "success": true, "message": "ok" });
    if let (Some(body), Some(extra)) = (body.as_object_mut(), payload.as_object()) {
        for (k, v) in extra {
            body.insert(k.clone(), v.clone());
        }
    }
    RawResponse::json(200, &body)
}

/// Non-2xx envelope carrying `message`.
pub(crate) fn error_reply(status: u16, message: &str) -> RawResponse {
    RawResponse::json(status, &json!({ "success": false, "message": message }))
}

pub(crate) fn task_json(id: &str, title: &str, status: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "due_date": null,
        "priority": "medium",
        "status": status,
        "created_by": "teacher-1",
        "assignee_id": null,
        "class_id": null,
        "created_at": "2026-10-01T00:00:00.000Z",
        "updated_at": "2026-10-01T00:00:00.000Z"
    })
}

pub(crate) fn notification_json(id: &str, is_read: bool) -> Value {
    json!({
        "id": id,
        "user_id": "u1",
        "type": "task_assigned",
        "title": "New task",
        "message": "You have a new task",
        "task_id": null,
        "class_id": null,
        "is_read": is_read,
        "created_at": "2026-10-01T00:00:00.000Z"
    })
}

pub(crate) fn class_json(id: &str, name: &str, invite_code: &str, description: Option<&str>) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": description,
        "invite_code": invite_code,
        "teacher_id": "teacher-1",
        "created_at": "2026-10-01T00:00:00.000Z",
        "updated_at": "2026-10-01T00:00:00.000Z"
    })
}

pub(crate) fn admin_user_json(id: &str, name: &str, role: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "email": format!("{id}@school.test"),
        "role": role,
        "isVerified": true,
        "status": "active",
        "lastLogin": null,
        "createdAt": "2026-01-01",
        "updatedAt": "2026-01-01"
    })
}

pub(crate) fn user_json(role: &str) -> Value {
    json!({ "id": "u1", "name": "Ada", "email": "ada@school.test", "role": role, "isVerified": true })
}

pub(crate) fn pagination_json(page: u32, limit: u32, total: u64, total_pages: u32) -> Value {
    json!({ "page": page, "limit": limit, "total": total, "totalPages": total_pages })
}
