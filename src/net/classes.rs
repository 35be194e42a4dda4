//! `/classes` endpoints.

use serde_json::json;

use super::api::{ApiClient, QueryParams};
use super::error::ApiError;
use super::transport::Method;
use super::types::{Ack, Class, ClassData, ClassListPayload, ClassPayload, Envelope, StudentOption, StudentsPayload};

fn class_path(id: &str) -> String {
    format!("/classes/{id}")
}

impl ApiClient {
    /// `GET /classes`: the full, unpaginated list visible to the caller.
    /// `search` is forwarded only when non-blank.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn list_classes(&self, search: Option<&str>) -> Result<Vec<Class>, ApiError> {
        let mut query = QueryParams::new();
        query.push("search", search);
        let env: Envelope<ClassListPayload> = self.get_with_query("/classes", query).await?;
        Ok(env.payload.classes)
    }

    /// `POST /classes`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn create_class(&self, name: &str, description: Option<&str>) -> Result<Envelope<ClassPayload>, ApiError> {
        let data = ClassData { name: Some(name.to_owned()), description: description.map(str::to_owned) };
        self.send_json(Method::Post, "/classes", &data).await
    }

    /// `GET /classes/:id`, with embedded members.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn get_class(&self, id: &str) -> Result<Option<Class>, ApiError> {
        let env: Envelope<ClassPayload> = self.get(class_path(id)).await?;
        Ok(env.payload.class)
    }

    /// `PUT /classes/:id`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn update_class(&self, id: &str, data: &ClassData) -> Result<Envelope<ClassPayload>, ApiError> {
        self.send_json(Method::Put, class_path(id), data).await
    }

    /// `DELETE /classes/:id`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn delete_class(&self, id: &str) -> Result<Envelope<Ack>, ApiError> {
        self.send_empty(Method::Delete, class_path(id)).await
    }

    /// `POST /classes/join`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`]; an unknown code is a server-side 404.
    pub async fn join_class(&self, invite_code: &str) -> Result<Envelope<ClassPayload>, ApiError> {
        self.send_json(Method::Post, "/classes/join", &json!({ "invite_code": invite_code }))
            .await
    }

    /// `GET /classes/:id/members`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn class_members(&self, class_id: &str) -> Result<Vec<StudentOption>, ApiError> {
        let env: Envelope<StudentsPayload> = self.get(format!("/classes/{class_id}/members")).await?;
        Ok(env.payload.students)
    }

    /// `DELETE /classes/:id/members/:userId`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn remove_class_member(&self, class_id: &str, user_id: &str) -> Result<Envelope<Ack>, ApiError> {
        self.send_empty(Method::Delete, format!("/classes/{class_id}/members/{user_id}"))
            .await
    }

    /// Assignee options for a task form: members of `class_id` when one is
    /// selected, otherwise every student.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn assignable_students(&self, class_id: Option<&str>) -> Result<Vec<StudentOption>, ApiError> {
        match class_id.filter(|id| !id.is_empty()) {
            Some(id) => Ok(self
                .get_class(id)
                .await?
                .map(|class| class.student_options())
                .unwrap_or_default()),
            None => self.task_students().await,
        }
    }
}
