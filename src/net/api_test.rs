use super::*;
use crate::net::admin::AdminUserFilters;
use crate::net::notifications::NotificationQuery;
use crate::net::tasks::TaskFilters;
use crate::net::testing::{MockTransport, error_reply, ok_reply, task_json, user_json};
use crate::net::transport::RawResponse;
use crate::net::types::{Ack, Priority, Role, TaskStatus, UpdateTaskData};
use serde_json::json;

// =============================================================================
// error classification
// =============================================================================

#[tokio::test]
async fn transport_failure_is_unreachable() {
    let transport = MockTransport::unreachable();
    let err = transport.client().task_stats().await.unwrap_err();
    assert!(matches!(err, ApiError::Unreachable { .. }));
    assert_eq!(err.to_string(), crate::net::error::UNREACHABLE_MESSAGE);
}

#[tokio::test]
async fn non_json_body_is_unexpected_response() {
    let transport = MockTransport::new(|_| Ok(RawResponse::new(200, "<html>proxy</html>")));
    let err = transport.client().me().await.unwrap_err();
    assert!(matches!(err, ApiError::UnexpectedResponse { .. }));
    assert_eq!(err.to_string(), crate::net::error::UNEXPECTED_RESPONSE_MESSAGE);
}

#[tokio::test]
async fn non_json_error_page_is_unexpected_response() {
    let transport = MockTransport::new(|_| Ok(RawResponse::new(502, "Bad Gateway")));
    let err = transport.client().me().await.unwrap_err();
    assert!(matches!(err, ApiError::UnexpectedResponse { .. }));
}

#[tokio::test]
async fn non_2xx_uses_server_message() {
    let transport = MockTransport::new(|_| Ok(error_reply(403, "Only teachers can create tasks")));
    let err = transport
        .client()
        .delete_task("t1")
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Server { status: 403, message: "Only teachers can create tasks".into() });
    assert_eq!(err.to_string(), "Only teachers can create tasks");
}

#[tokio::test]
async fn non_2xx_without_message_falls_back() {
    let transport = MockTransport::new(|_| Ok(RawResponse::json(500, &json!({ "success": false }))));
    let err = transport.client().logout().await.unwrap_err();
    assert_eq!(err.to_string(), crate::net::error::FALLBACK_SERVER_MESSAGE);
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn unauthorized_is_detectable() {
    let transport = MockTransport::new(|_| Ok(error_reply(401, "Not authenticated")));
    let err = transport.client().me().await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn wrong_payload_shape_is_unexpected_response() {
    let transport = MockTransport::ok(json!({ "tasks": [{ "id": 42 }] }));
    let err = transport
        .client()
        .list_tasks(&TaskFilters::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::UnexpectedResponse { .. }));
}

// =============================================================================
// request shapes
// =============================================================================

#[tokio::test]
async fn list_tasks_omits_absent_filters() {
    let transport = MockTransport::ok(json!({ "tasks": [] }));
    let filters = TaskFilters {
        status: Some(TaskStatus::InProgress),
        search: Some("   ".into()),
        page: Some(2),
        limit: Some(10),
        ..TaskFilters::default()
    };
    transport.client().list_tasks(&filters).await.unwrap();

    let req = &transport.requests()[0];
    assert_eq!(req.method, Method::Get);
    assert_eq!(req.path, "/tasks");
    assert_eq!(
        req.query,
        vec![
            ("status".to_owned(), "in-progress".to_owned()),
            ("page".to_owned(), "2".to_owned()),
            ("limit".to_owned(), "10".to_owned()),
        ]
    );
}

#[tokio::test]
async fn list_tasks_decodes_items_and_pagination() {
    let transport = MockTransport::ok(json!({
        "tasks": [task_json("t1", "Essay", "todo")],
        "pagination": { "page": 1, "limit": 10, "total": 1, "totalPages": 1 }
    }));
    let env = transport
        .client()
        .list_tasks(&TaskFilters::default())
        .await
        .unwrap();
    assert_eq!(env.payload.tasks[0].title, "Essay");
    assert_eq!(env.payload.pagination.map(|p| p.total_pages), Some(1));
    assert!(transport.requests()[0].query.is_empty());
}

#[tokio::test]
async fn admin_user_filters_serialize_all_keys_in_order() {
    let transport = MockTransport::ok(json!({ "users": [] }));
    let filters = AdminUserFilters {
        search: Some("ada".into()),
        role: Some(Role::Teacher),
        status: None,
        page: Some(1),
        limit: Some(20),
        sort_by: Some("name".into()),
        sort_order: Some(crate::net::types::SortOrder::Desc),
    };
    transport.client().list_users(&filters).await.unwrap();
    let keys: Vec<String> = transport.requests()[0]
        .query
        .iter()
        .map(|(k, _)| k.clone())
        .collect();
    assert_eq!(keys, ["search", "role", "page", "limit", "sort_by", "sort_order"]);
}

#[tokio::test]
async fn notification_query_sends_unread_only_flag_only_when_set() {
    let transport = MockTransport::ok(json!({ "notifications": [] }));
    let client = transport.client();
    client
        .list_notifications(&NotificationQuery { limit: Some(8), ..NotificationQuery::default() })
        .await
        .unwrap();
    client
        .list_notifications(&NotificationQuery { unread_only: true, ..NotificationQuery::default() })
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].query_value("unread_only"), None);
    assert_eq!(requests[0].query_value("limit"), Some("8"));
    assert_eq!(requests[1].query_value("unread_only"), Some("true"));
}

#[tokio::test]
async fn update_task_sends_put_with_json_body() {
    let transport = MockTransport::ok(json!({ "task": task_json("t9", "Lab", "completed") }));
    let data = UpdateTaskData { priority: Some(Priority::Low), ..UpdateTaskData::status(TaskStatus::Completed) };
    transport.client().update_task("t9", &data).await.unwrap();

    let req = &transport.requests()[0];
    assert_eq!(req.method, Method::Put);
    assert_eq!(req.path, "/tasks/t9");
    assert_eq!(req.body, Some(json!({ "priority": "low", "status": "completed" })));
}

#[tokio::test]
async fn change_role_patches_role_endpoint() {
    let transport = MockTransport::ok(json!({}));
    transport
        .client()
        .change_user_role("u7", Role::Admin)
        .await
        .unwrap();
    let req = &transport.requests()[0];
    assert_eq!(req.method, Method::Patch);
    assert_eq!(req.path, "/admin/users/u7/role");
    assert_eq!(req.body, Some(json!({ "role": "admin" })));
}

#[tokio::test]
async fn join_class_posts_invite_code() {
    let transport = MockTransport::ok(json!({}));
    let _ = transport.client().join_class("BIO123").await;
    let req = &transport.requests()[0];
    assert_eq!((req.method, req.path.as_str()), (Method::Post, "/classes/join"));
    assert_eq!(req.body, Some(json!({ "invite_code": "BIO123" })));
}

#[tokio::test]
async fn me_returns_user_from_envelope() {
    let transport = MockTransport::new(|_| Ok(ok_reply(&json!({ "user": user_json("student") }))));
    let user = transport.client().me().await.unwrap().unwrap();
    assert_eq!(user.role, Role::Student);
}

#[tokio::test]
async fn unread_count_defaults_to_zero_when_missing() {
    let transport = MockTransport::ok(json!({}));
    assert_eq!(transport.client().unread_count().await.unwrap(), 0);
}

#[tokio::test]
async fn assignable_students_uses_class_members_when_class_selected() {
    let transport = MockTransport::new(|req| {
        if req.path == "/classes/c1" {
            Ok(ok_reply(&json!({ "class": {
                "id": "c1", "name": "Bio", "description": null, "invite_code": "BIO", "teacher_id": "t",
                "created_at": "x", "updated_at": "x",
                "members": [{ "user_id": "s1", "joined_at": "x",
                    "user": { "id": "s1", "name": "Sam", "email": "s@x", "role": "student" } }]
            }})))
        } else {
            Ok(ok_reply(&json!({ "students": [{ "id": "s2", "name": "Kim", "email": "k@x" }] })))
        }
    });
    let client = transport.client();
    let in_class = client.assignable_students(Some("c1")).await.unwrap();
    let everyone = client.assignable_students(None).await.unwrap();
    assert_eq!(in_class[0].id, "s1");
    assert_eq!(everyone[0].id, "s2");
    assert_eq!(transport.count(Method::Get, "/tasks/students"), 1);
}

#[test]
fn query_params_skip_zero_and_blank() {
    let mut q = QueryParams::new();
    q.push("search", Some("")).push_number("page", Some(0)).push_flag("unread_only", false);
    assert!(q.is_empty());
}

#[tokio::test]
async fn ack_envelope_keeps_message() {
    let transport = MockTransport::new(|_| Ok(RawResponse::json(200, &json!({ "success": true, "message": "Task deleted" }))));
    let env: crate::net::types::Envelope<Ack> = transport.client().delete_task("t1").await.unwrap();
    assert_eq!(env.message, "Task deleted");
}
