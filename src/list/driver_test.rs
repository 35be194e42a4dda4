use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use super::*;
use crate::list::source::{Keyed, TaskSource};
use crate::net::ApiClient;
use crate::net::Method;
use crate::net::testing::{MockTransport, ok_reply, pagination_json, task_json};
use crate::net::types::{Task, TaskStatus};

const DEBOUNCE: Duration = Duration::from_millis(400);
const TTL: Duration = Duration::from_secs(3);

fn tasks_reply() -> serde_json::Value {
    json!({
        "tasks": [task_json("t1", "Lab report", "todo"), task_json("t2", "Essay", "todo")],
        "pagination": pagination_json(1, 10, 2, 1)
    })
}

fn spawn_tasks(transport: &Arc<MockTransport>) -> ListHandle<TaskSource> {
    let controller = ListController::new(TaskSource::new(transport.client()), 10, TTL);
    ListHandle::spawn(controller, DEBOUNCE)
}

fn searches(transport: &MockTransport) -> Vec<Option<String>> {
    transport
        .requests()
        .iter()
        .filter(|r| r.method == Method::Get && r.path == "/tasks")
        .map(|r| r.query_value("search").map(str::to_owned))
        .collect()
}

// =============================================================================
// SCRIPTED SOURCE
// =============================================================================

/// Serves one task per page (`p<page>`), sleeping first on slow pages.
struct PagedSource {
    api: ApiClient,
    slow_pages: Vec<u32>,
    started: Arc<Mutex<Vec<u32>>>,
    finished: Arc<Mutex<Vec<u32>>>,
}

#[async_trait]
impl ListSource for PagedSource {
    type Item = Task;
    const NOUN: &'static str = "Task";

    fn api(&self) -> &ApiClient {
        &self.api
    }

    async fn fetch(&self, filters: &FilterState) -> Result<Snapshot<Task>, ListError> {
        let page = filters.page();
        self.started.lock().unwrap().push(page);
        if self.slow_pages.contains(&page) {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        self.finished.lock().unwrap().push(page);
        let task = serde_json::from_value(task_json(&format!("p{page}"), "Paged", "todo")).unwrap();
        Ok(Snapshot { items: vec![task], pagination: Pagination { page, limit: 10, total: 50, total_pages: 5 } })
    }
}

struct Paged {
    handle: ListHandle<PagedSource>,
    started: Arc<Mutex<Vec<u32>>>,
    finished: Arc<Mutex<Vec<u32>>>,
}

fn spawn_paged(slow_pages: Vec<u32>) -> Paged {
    let started = Arc::new(Mutex::new(Vec::new()));
    let finished = Arc::new(Mutex::new(Vec::new()));
    let source = PagedSource {
        api: MockTransport::unreachable().client(),
        slow_pages,
        started: started.clone(),
        finished: finished.clone(),
    };
    let handle = ListHandle::spawn(ListController::new(source, 10, TTL), DEBOUNCE);
    Paged { handle, started, finished }
}

fn first_key(view: &ListView<Task>) -> Option<&str> {
    view.items.first().map(Keyed::key)
}

// =============================================================================
// TESTS
// =============================================================================

#[tokio::test(start_paused = true)]
async fn spawning_fetches_once() {
    let transport = MockTransport::ok(tasks_reply());
    let handle = spawn_tasks(&transport);
    assert!(handle.view().loading);

    let view = handle.wait_for(|v| !v.loading).await.unwrap();

    assert_eq!(view.items.len(), 2);
    assert_eq!(view.pagination.total, 2);
    assert_eq!(transport.count(Method::Get, "/tasks"), 1);
}

#[tokio::test(start_paused = true)]
async fn rapid_keystrokes_commit_only_last_value() {
    let transport = MockTransport::ok(tasks_reply());
    let handle = spawn_tasks(&transport);
    handle.wait_for(|v| !v.loading).await.unwrap();

    for text in ["l", "la", "lab"] {
        handle.search(text).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(handle.view().pending_search.as_deref(), Some(text));
    }
    let view = handle
        .wait_for(|v| v.filters.search() == Some("lab") && !v.loading)
        .await
        .unwrap();

    assert_eq!(view.pending_search, None);
    assert_eq!(searches(&transport), [None, Some("lab".to_owned())]);
}

#[tokio::test(start_paused = true)]
async fn submit_commits_without_waiting() {
    let transport = MockTransport::ok(tasks_reply());
    let handle = spawn_tasks(&transport);
    handle.wait_for(|v| !v.loading).await.unwrap();

    handle.search("essay").await.unwrap();
    handle.submit_search().await.unwrap();
    handle
        .wait_for(|v| v.filters.search() == Some("essay") && !v.loading)
        .await
        .unwrap();

    assert_eq!(searches(&transport), [None, Some("essay".to_owned())]);
}

#[tokio::test(start_paused = true)]
async fn committing_current_search_again_does_not_refetch() {
    let transport = MockTransport::ok(tasks_reply());
    let handle = spawn_tasks(&transport);
    handle.search("lab").await.unwrap();
    handle
        .wait_for(|v| v.filters.search() == Some("lab") && !v.loading)
        .await
        .unwrap();

    handle.search("lab").await.unwrap();
    tokio::time::sleep(DEBOUNCE * 2).await;

    assert_eq!(searches(&transport).len(), 2);
}

#[tokio::test(start_paused = true)]
async fn filter_change_returns_to_first_page() {
    let transport = MockTransport::ok(tasks_reply());
    let handle = spawn_tasks(&transport);
    handle.set_page(4).await.unwrap();
    handle
        .wait_for(|v| v.filters.page() == 4 && !v.loading)
        .await
        .unwrap();

    handle.set_filter("priority", "high").await.unwrap();
    let view = handle
        .wait_for(|v| v.filters.get("priority") == Some("high") && !v.loading)
        .await
        .unwrap();

    assert_eq!(view.filters.page(), 1);
    let last = transport.requests().pop().unwrap();
    assert_eq!(last.query_value("page"), Some("1"));
    assert_eq!(last.query_value("priority"), Some("high"));
}

#[tokio::test(start_paused = true)]
async fn superseded_fetch_is_aborted() {
    let paged = spawn_paged(vec![2]);
    paged.handle.wait_for(|v| !v.loading).await.unwrap();

    paged.handle.set_page(2).await.unwrap();
    while !paged.started.lock().unwrap().contains(&2) {
        tokio::task::yield_now().await;
    }
    paged.handle.set_page(3).await.unwrap();
    let view = paged
        .handle
        .wait_for(|v| first_key(v) == Some("p3") && !v.loading)
        .await
        .unwrap();
    assert_eq!(view.pagination.page, 3);

    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(first_key(&paged.handle.view()), Some("p3"));
    assert!(!paged.finished.lock().unwrap().contains(&2), "page 2 fetch should have been aborted");
}

#[tokio::test(start_paused = true)]
async fn dropping_handle_aborts_in_flight_fetch() {
    let paged = spawn_paged(vec![1]);
    while paged.started.lock().unwrap().is_empty() {
        tokio::task::yield_now().await;
    }

    let finished = paged.finished.clone();
    drop(paged.handle);
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert!(finished.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn mutations_run_inside_the_driver() {
    let transport = MockTransport::new(|req| match req.method {
        Method::Get => Ok(ok_reply(&tasks_reply())),
        _ => Ok(ok_reply(&json!({}))),
    });
    let handle = spawn_tasks(&transport);
    handle.wait_for(|v| !v.loading).await.unwrap();

    handle
        .apply(|list| {
            Box::pin(async move {
                let _ = list.start_task("t2").await;
            })
        })
        .await
        .unwrap();
    let view = handle
        .wait_for(|v| v.items.iter().any(|t| t.id == "t2" && t.status == TaskStatus::InProgress))
        .await
        .unwrap();

    assert_eq!(view.items[0].status, TaskStatus::Todo);
    assert_eq!(transport.count(Method::Put, "/tasks/t2"), 1);
}

#[tokio::test(start_paused = true)]
async fn success_banner_clears_itself() {
    let transport = MockTransport::ok(tasks_reply());
    let handle = spawn_tasks(&transport);
    handle.wait_for(|v| !v.loading).await.unwrap();

    handle
        .apply(|list| {
            Box::pin(async move {
                list.request_delete("t1");
                let _ = list.confirm_delete("t1").await;
            })
        })
        .await
        .unwrap();
    handle.wait_for(|v| v.success.is_some()).await.unwrap();
    let before = tokio::time::Instant::now();
    handle.wait_for(|v| v.success.is_none()).await.unwrap();

    assert!(before.elapsed() >= TTL - Duration::from_millis(1));
}

#[tokio::test]
async fn commands_fail_once_driver_is_gone() {
    let transport = MockTransport::ok(tasks_reply());
    let handle = spawn_tasks(&transport);
    handle.task.abort();
    while !handle.task.is_finished() {
        tokio::task::yield_now().await;
    }
    assert_eq!(handle.refresh().await, Err(DriverClosed));
}
