//! `/tasks` endpoints.

use super::api::{ApiClient, QueryParams};
use super::error::ApiError;
use super::transport::Method;
use super::types::{
    Ack, CreateTaskData, Envelope, Priority, StatsPayload, StudentOption, StudentsPayload, Task, TaskListPayload,
    TaskPayload, TaskStats, TaskStatus, UpdateTaskData,
};

/// Query for `GET /tasks`. Unset fields are omitted from the query string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskFilters {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub search: Option<String>,
    pub class_id: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl TaskFilters {
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut q = QueryParams::new();
        q.push("status", self.status.map(TaskStatus::as_str))
            .push("priority", self.priority.map(Priority::as_str))
            .push("search", self.search.as_deref())
            .push("class_id", self.class_id.as_deref())
            .push_number("page", self.page)
            .push_number("limit", self.limit);
        q
    }
}

pub(crate) fn task_path(id: &str) -> String {
    format!("/tasks/{id}")
}

impl ApiClient {
    /// `GET /tasks`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn list_tasks(&self, filters: &TaskFilters) -> Result<Envelope<TaskListPayload>, ApiError> {
        self.get_with_query("/tasks", filters.to_query()).await
    }

    /// `POST /tasks`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn create_task(&self, data: &CreateTaskData) -> Result<Envelope<TaskPayload>, ApiError> {
        self.send_json(Method::Post, "/tasks", data).await
    }

    /// `GET /tasks/:id`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn get_task(&self, id: &str) -> Result<Option<Task>, ApiError> {
        let env: Envelope<TaskPayload> = self.get(task_path(id)).await?;
        Ok(env.payload.task)
    }

    /// `PUT /tasks/:id`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn update_task(&self, id: &str, data: &UpdateTaskData) -> Result<Envelope<TaskPayload>, ApiError> {
        self.send_json(Method::Put, task_path(id), data).await
    }

    /// `DELETE /tasks/:id`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn delete_task(&self, id: &str) -> Result<Envelope<Ack>, ApiError> {
        self.send_empty(Method::Delete, task_path(id)).await
    }

    /// `GET /tasks/stats`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn task_stats(&self) -> Result<Option<TaskStats>, ApiError> {
        let env: Envelope<StatsPayload<TaskStats>> = self.get("/tasks/stats").await?;
        Ok(env.payload.stats)
    }

    /// `GET /tasks/students`: every student a task may be assigned to.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn task_students(&self) -> Result<Vec<StudentOption>, ApiError> {
        let env: Envelope<StudentsPayload> = self.get("/tasks/students").await?;
        Ok(env.payload.students)
    }
}
