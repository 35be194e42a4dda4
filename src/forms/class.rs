//! Class create/edit and join-by-code forms.

use async_trait::async_trait;
use tracing::info;

use super::{FormError, ResourceForm, ValidationError, non_blank, require};
use crate::net::types::{Class, ClassData};
use crate::net::{ApiClient, ApiError};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassForm {
    pub name: String,
    pub description: String,
}

#[async_trait]
impl ResourceForm for ClassForm {
    type Resource = Class;

    fn blank() -> Self {
        Self::default()
    }

    fn from_resource(class: &Class) -> Self {
        Self { name: class.name.clone(), description: class.description.clone().unwrap_or_default() }
    }

    fn validate(&self, _editing: Option<&Class>) -> Result<(), ValidationError> {
        require(&self.name, "Class name")
    }

    async fn submit(&self, api: &ApiClient, editing: Option<&Class>) -> Result<(), ApiError> {
        let name = self.name.trim();
        let description = non_blank(&self.description);
        match editing {
            Some(class) => {
                let data = ClassData { name: Some(name.to_owned()), description };
                api.update_class(&class.id, &data).await.map(drop)
            }
            None => api
                .create_class(name, description.as_deref())
                .await
                .map(drop),
        }
    }
}

/// Student-side "join a class" box.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JoinClassForm {
    pub invite_code: String,
}

impl JoinClassForm {
    /// # Errors
    ///
    /// [`FormError::Invalid`] for a blank code (no request is sent), or the
    /// server error for an unknown code.
    pub async fn submit(&self, api: &ApiClient) -> Result<Option<Class>, FormError> {
        require(&self.invite_code, "Invite code")?;
        let env = api.join_class(self.invite_code.trim()).await?;
        if let Some(class) = &env.payload.class {
            info!(class_id = %class.id, "joined class");
        }
        Ok(env.payload.class)
    }
}
