//! Task create/edit form.

use async_trait::async_trait;
use tracing::debug;

use super::{ResourceForm, ValidationError, non_blank, require};
use crate::net::types::{CreateTaskData, Priority, StudentOption, Task, TaskStatus, UpdateTaskData};
use crate::net::{ApiClient, ApiError};

/// The one dropdown that may be open at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Popover {
    Priority,
    Status,
    Class,
    Assignee,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD`, or empty.
    pub due_date: String,
    pub priority: Priority,
    pub status: TaskStatus,
    /// Empty means no class.
    pub class_id: String,
    /// Empty means unassigned.
    pub assignee_id: String,
    popover: Option<Popover>,
    students: Vec<StudentOption>,
}

impl TaskForm {
    #[must_use]
    pub fn popover(&self) -> Option<Popover> {
        self.popover
    }

    /// Open `which`, closing any other; toggling the open one closes it.
    pub fn toggle_popover(&mut self, which: Popover) {
        self.popover = if self.popover == Some(which) { None } else { Some(which) };
    }

    pub fn close_popovers(&mut self) {
        self.popover = None;
    }

    pub fn select_priority(&mut self, priority: Priority) {
        self.priority = priority;
        self.popover = None;
    }

    pub fn select_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.popover = None;
    }

    /// Pick a class (`None` for no class). Reload assignees afterwards with
    /// [`TaskForm::load_assignees`].
    pub fn select_class(&mut self, class_id: Option<&str>) {
        self.class_id = class_id.unwrap_or_default().to_owned();
        self.popover = None;
    }

    pub fn select_assignee(&mut self, student_id: Option<&str>) {
        self.assignee_id = student_id.unwrap_or_default().to_owned();
        self.popover = None;
    }

    /// Assignee options for the selected class (or every student).
    #[must_use]
    pub fn students(&self) -> &[StudentOption] {
        &self.students
    }

    #[must_use]
    pub fn assignee(&self) -> Option<&StudentOption> {
        self.students
            .iter()
            .find(|s| s.id == self.assignee_id)
    }

    /// Refresh assignee options. A failure leaves the current options in
    /// place.
    pub async fn load_assignees(&mut self, api: &ApiClient) {
        match api
            .assignable_students(non_blank(&self.class_id).as_deref())
            .await
        {
            Ok(students) => self.students = students,
            Err(e) => debug!(error = %e, class_id = %self.class_id, "task form: assignee options failed"),
        }
    }

    fn create_data(&self) -> CreateTaskData {
        CreateTaskData {
            title: self.title.trim().to_owned(),
            description: non_blank(&self.description),
            due_date: non_blank(&self.due_date),
            priority: Some(self.priority),
            assignee_id: non_blank(&self.assignee_id),
            class_id: non_blank(&self.class_id),
        }
    }

    /// Edit payload: blank description / due date are left out; blank class
    /// and assignee are sent as `null` to clear them.
    fn update_data(&self) -> UpdateTaskData {
        UpdateTaskData {
            title: Some(self.title.trim().to_owned()),
            description: non_blank(&self.description),
            due_date: non_blank(&self.due_date),
            priority: Some(self.priority),
            status: Some(self.status),
            assignee_id: Some(non_blank(&self.assignee_id)),
            class_id: Some(non_blank(&self.class_id)),
        }
    }
}

#[async_trait]
impl ResourceForm for TaskForm {
    type Resource = Task;

    fn blank() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            due_date: String::new(),
            priority: Priority::Medium,
            status: TaskStatus::Todo,
            class_id: String::new(),
            assignee_id: String::new(),
            popover: None,
            students: Vec::new(),
        }
    }

    fn from_resource(task: &Task) -> Self {
        let due_date = task
            .due_date
            .as_deref()
            .and_then(|d| d.split('T').next())
            .unwrap_or_default()
            .to_owned();
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            due_date,
            priority: task.priority,
            status: task.status,
            class_id: task.class_id.clone().unwrap_or_default(),
            assignee_id: task.assignee_id.clone().unwrap_or_default(),
            popover: None,
            students: task.assignee.clone().into_iter().collect(),
        }
    }

    fn validate(&self, _editing: Option<&Task>) -> Result<(), ValidationError> {
        require(&self.title, "Title")
    }

    async fn submit(&self, api: &ApiClient, editing: Option<&Task>) -> Result<(), ApiError> {
        match editing {
            Some(task) => api.update_task(&task.id, &self.update_data()).await.map(drop),
            None => api.create_task(&self.create_data()).await.map(drop),
        }
    }
}

#[cfg(test)]
#[path = "task_test.rs"]
mod tests;
