//! Resource-specific list operations.

use tracing::info;

use super::controller::ListController;
use super::source::{ClassSource, ListSource, NotificationSource, TaskSource, UserSource};
use crate::net::ApiError;
use crate::net::types::{Class, Role, TaskStatus, UpdateTaskData};

impl ListController<TaskSource> {
    /// Change one task's status; the row updates only after the server
    /// accepts it.
    ///
    /// # Errors
    ///
    /// Returns the server error; the row keeps its old status.
    pub async fn set_task_status(&mut self, id: &str, status: TaskStatus) -> Result<(), ApiError> {
        let outcome = self
            .source()
            .api()
            .update_task(id, &UpdateTaskData::status(status))
            .await
            .map(drop);
        self.settle_patch(id, outcome, |task| task.status = status)
    }

    /// `todo` → `in-progress`.
    ///
    /// # Errors
    ///
    /// See [`ListController::set_task_status`].
    pub async fn start_task(&mut self, id: &str) -> Result<(), ApiError> {
        self.set_task_status(id, TaskStatus::InProgress).await
    }

    /// # Errors
    ///
    /// See [`ListController::set_task_status`].
    pub async fn complete_task(&mut self, id: &str) -> Result<(), ApiError> {
        self.set_task_status(id, TaskStatus::Completed).await
    }
}

impl ListController<UserSource> {
    /// # Errors
    ///
    /// Returns the server error; the row keeps its old role.
    pub async fn change_role(&mut self, id: &str, role: Role) -> Result<(), ApiError> {
        let outcome = self
            .source()
            .api()
            .change_user_role(id, role)
            .await
            .map(drop);
        self.settle_patch(id, outcome, |user| user.role = role)
    }
}

impl ListController<NotificationSource> {
    /// # Errors
    ///
    /// Returns the server error; the row stays unread.
    pub async fn mark_read(&mut self, id: &str) -> Result<(), ApiError> {
        let outcome = self
            .source()
            .api()
            .mark_notification_read(id)
            .await
            .map(drop);
        self.settle_patch(id, outcome, |n| n.is_read = true)
    }

    /// Mark everything read. Safe to repeat.
    ///
    /// # Errors
    ///
    /// Returns the server error; rows are left as they were.
    pub async fn mark_all_read(&mut self) -> Result<(), ApiError> {
        match self
            .source()
            .api()
            .mark_all_notifications_read()
            .await
        {
            Ok(_) => {
                self.banners_mut().clear_error();
                self.patch_all(|n| n.is_read = true);
                Ok(())
            }
            Err(e) => {
                self.banners_mut().set_error(e.to_string());
                Err(e)
            }
        }
    }

    /// Unread rows on the current page.
    #[must_use]
    pub fn unread_on_page(&self) -> usize {
        self.items().iter().filter(|n| !n.is_read).count()
    }
}

impl ListController<ClassSource> {
    /// Join a class by invite code, then refetch.
    ///
    /// # Errors
    ///
    /// Returns the server error (e.g. unknown code) after putting it in the
    /// banner.
    pub async fn join(&mut self, invite_code: &str) -> Result<Option<Class>, ApiError> {
        let outcome = self
            .source()
            .api()
            .join_class(invite_code.trim())
            .await;
        match outcome {
            Ok(env) => {
                let class = env.payload.class;
                info!(invite_code, class_id = class.as_ref().map(|c| c.id.as_str()), "classes: joined");
                self.banners_mut().clear_error();
                let name = class.as_ref().map_or("class", |c| c.name.as_str());
                let message = format!("Joined {name}");
                self.banners_mut().flash_success(message);
                self.refresh().await;
                Ok(class)
            }
            Err(e) => {
                self.banners_mut().set_error(e.to_string());
                Err(e)
            }
        }
    }
}
