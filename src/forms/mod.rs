//! Create/edit forms and the modal that hosts them.
//!
//! DESIGN
//! ======
//! Every form validates locally before any network call. Resource forms
//! (user, task, class) implement [`ResourceForm`] and run inside a
//! [`CrudModal`]; the stand-alone account forms (join, signup, reset) submit
//! directly and report [`FormError`].

mod account;
mod class;
mod modal;
mod task;
mod user;

use async_trait::async_trait;

pub use account::{ForgotPasswordForm, ResetPasswordForm, SignupForm};
pub use class::{ClassForm, JoinClassForm};
pub use modal::{CrudModal, PendingSave, SubmitOutcome};
pub use task::{Popover, TaskForm};
pub use user::UserForm;

use crate::net::{ApiClient, ApiError};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Client-side validation failure. The display text is what the form shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Name and email are required")]
    NameAndEmailRequired,
    #[error("Password is required for new users")]
    PasswordRequired,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Failure of a stand-alone form submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A form editing one kind of resource.
#[async_trait]
pub trait ResourceForm: Clone + Send + Sync {
    type Resource: Clone + Send + Sync;

    /// Empty form for create mode.
    fn blank() -> Self;

    /// Form pre-filled from `resource` for edit mode.
    fn from_resource(resource: &Self::Resource) -> Self;

    /// Local checks; `editing` is the resource being edited, if any.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    fn validate(&self, editing: Option<&Self::Resource>) -> Result<(), ValidationError>;

    /// Send the create or update.
    async fn submit(&self, api: &ApiClient, editing: Option<&Self::Resource>) -> Result<(), ApiError>;
}

fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(())
    }
}

/// A new password: at least [`MIN_PASSWORD_LEN`] characters.
fn check_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        Err(ValidationError::PasswordTooShort)
    } else {
        Ok(())
    }
}

fn check_confirmation(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password == confirm {
        Ok(())
    } else {
        Err(ValidationError::PasswordMismatch)
    }
}

/// Trimmed value, or `None` when blank.
fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}
