//! Admin user create/edit form.

use async_trait::async_trait;

use super::{ResourceForm, ValidationError, check_password};
use crate::net::types::{AdminUser, CreateUserData, Role, UpdateUserData};
use crate::net::{ApiClient, ApiError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    /// Required on create; on edit, blank keeps the current password.
    pub password: String,
    pub role: Role,
}

#[async_trait]
impl ResourceForm for UserForm {
    type Resource = AdminUser;

    fn blank() -> Self {
        Self { name: String::new(), email: String::new(), password: String::new(), role: Role::Student }
    }

    fn from_resource(user: &AdminUser) -> Self {
        Self { name: user.name.clone(), email: user.email.clone(), password: String::new(), role: user.role }
    }

    fn validate(&self, editing: Option<&AdminUser>) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() {
            return Err(ValidationError::NameAndEmailRequired);
        }
        if editing.is_none() && self.password.is_empty() {
            return Err(ValidationError::PasswordRequired);
        }
        if !self.password.is_empty() {
            check_password(&self.password)?;
        }
        Ok(())
    }

    async fn submit(&self, api: &ApiClient, editing: Option<&AdminUser>) -> Result<(), ApiError> {
        match editing {
            Some(user) => {
                let data = UpdateUserData {
                    name: Some(self.name.trim().to_owned()),
                    email: Some(self.email.trim().to_owned()),
                    password: (!self.password.is_empty()).then(|| self.password.clone()),
                    role: Some(self.role),
                };
                api.update_user(&user.id, &data).await.map(drop)
            }
            None => {
                let data = CreateUserData {
                    name: self.name.trim().to_owned(),
                    email: self.email.trim().to_owned(),
                    password: self.password.clone(),
                    role: Some(self.role),
                };
                api.create_user(&data).await.map(drop)
            }
        }
    }
}

#[cfg(test)]
#[path = "user_test.rs"]
mod tests;
