//! Signup and password-recovery forms.

use super::{FormError, ValidationError, check_confirmation, check_password, require};
use crate::session::{Session, SessionContext};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() {
            return Err(ValidationError::NameAndEmailRequired);
        }
        check_password(&self.password)?;
        check_confirmation(&self.password, &self.confirm_password)
    }

    /// Validate, then sign up through the session so the new user is
    /// logged in.
    ///
    /// # Errors
    ///
    /// [`FormError::Invalid`] without a request, or the server error (also
    /// kept in the session's error banner).
    pub async fn submit<'a>(&self, session: &'a mut SessionContext) -> Result<&'a Session, FormError> {
        self.validate()?;
        Ok(session
            .signup(self.name.trim(), self.email.trim(), &self.password)
            .await?)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ForgotPasswordForm {
    pub email: String,
}

impl ForgotPasswordForm {
    /// Returns the server's confirmation message.
    ///
    /// # Errors
    ///
    /// [`FormError::Invalid`] for a blank email, or the server error.
    pub async fn submit(&self, session: &SessionContext) -> Result<String, FormError> {
        require(&self.email, "Email")?;
        Ok(session.forgot_password(&self.email).await?)
    }
}

/// Reset form reached from the emailed link; `token` comes from the URL.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResetPasswordForm {
    pub token: String,
    pub password: String,
    pub confirm_password: String,
}

impl ResetPasswordForm {
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.token, "Reset token")?;
        check_password(&self.password)?;
        check_confirmation(&self.password, &self.confirm_password)
    }

    /// # Errors
    ///
    /// [`FormError::Invalid`] without a request, or the server error.
    pub async fn submit(&self, session: &SessionContext) -> Result<String, FormError> {
        self.validate()?;
        Ok(session
            .reset_password(self.token.trim(), &self.password)
            .await?)
    }
}
