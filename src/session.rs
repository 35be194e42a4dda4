//! Session context: who is logged in, validated against the server.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `SessionContext` exists per app instance and is handed to every page
//! that needs identity. Pages call [`SessionContext::guard`] before rendering
//! protected content; that redirect is the only access control on the
//! client side (the server enforces roles for real).
//!
//! DESIGN
//! ======
//! `checking -> authenticated | anonymous`. A missing or invalid session is
//! not an error: `init` lands in `anonymous` silently. Login and signup
//! failures keep the message for the form banner and still return `Err` so
//! the caller can branch. Logout clears local state whether or not the
//! server call succeeds.

use tracing::{info, warn};

use crate::net::types::{Role, User};
use crate::net::{ApiClient, ApiError};

/// Authenticated identity.
pub type Session = User;

pub const LOGIN_ROUTE: &str = "/login";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Initial validation has not resolved yet; render nothing.
    #[default]
    Checking,
    Authenticated(Session),
    Anonymous,
}

/// Outcome of a route guard check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision<'a> {
    /// Still checking; render nothing and decide later.
    Pending,
    Allow(&'a Session),
    Redirect(&'static str),
}

pub struct SessionContext {
    api: ApiClient,
    state: SessionState,
    error: Option<String>,
}

impl SessionContext {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api, state: SessionState::Checking, error: None }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn user(&self) -> Option<&Session> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            SessionState::Checking | SessionState::Anonymous => None,
        }
    }

    #[must_use]
    pub fn is_checking(&self) -> bool {
        self.state == SessionState::Checking
    }

    /// Message from the last failed login/signup, for the form banner.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Validate the session cookie with `GET /auth/me` (app mount).
    pub async fn init(&mut self) -> &SessionState {
        self.state = SessionState::Checking;
        self.state = match self.api.me().await {
            Ok(Some(user)) => {
                info!(user_id = %user.id, role = %user.role, "session restored");
                SessionState::Authenticated(user)
            }
            Ok(None) => SessionState::Anonymous,
            Err(e) => {
                if !e.is_unauthorized() {
                    warn!(error = %e, "session check failed; continuing anonymous");
                }
                SessionState::Anonymous
            }
        };
        &self.state
    }

    /// Return to the pre-validation state (app unmount).
    pub fn teardown(&mut self) {
        self.state = SessionState::Checking;
        self.error = None;
    }

    /// # Errors
    ///
    /// Returns the API error after storing its message. An existing session
    /// is kept; otherwise the context stays anonymous.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&Session, ApiError> {
        self.error = None;
        let result = self
            .api
            .login(email, password)
            .await
            .map(|env| env.payload.user);
        self.settle_auth(result, "login")
    }

    /// # Errors
    ///
    /// Same contract as [`SessionContext::login`].
    pub async fn signup(&mut self, name: &str, email: &str, password: &str) -> Result<&Session, ApiError> {
        self.error = None;
        let result = self
            .api
            .signup(name, email, password)
            .await
            .map(|env| env.payload.user);
        self.settle_auth(result, "signup")
    }

    /// Always ends anonymous, even if the server cannot be reached.
    pub async fn logout(&mut self) {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "logout request failed; clearing local session anyway");
        }
        if let Some(user) = self.user() {
            info!(user_id = %user.id, "logged out");
        }
        self.state = SessionState::Anonymous;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // =========================================================================
    // ACCOUNT RECOVERY
    // =========================================================================
    //
    // These go straight to the server and never change session state. Each
    // returns the server's confirmation message.

    /// # Errors
    ///
    /// Returns the server error (e.g. an expired code).
    pub async fn verify_email(&self, code: &str) -> Result<String, ApiError> {
        Ok(self.api.verify_email(code.trim()).await?.message)
    }

    /// # Errors
    ///
    /// Returns the server error.
    pub async fn forgot_password(&self, email: &str) -> Result<String, ApiError> {
        Ok(self.api.forgot_password(email.trim()).await?.message)
    }

    /// # Errors
    ///
    /// Returns the server error (e.g. an invalid or expired token).
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<String, ApiError> {
        Ok(self.api.reset_password(token, password).await?.message)
    }

    /// Decide whether a page restricted to `allowed` roles may render.
    /// An empty `allowed` slice admits any authenticated user.
    #[must_use]
    pub fn guard(&self, allowed: &[Role]) -> GuardDecision<'_> {
        match &self.state {
            SessionState::Checking => GuardDecision::Pending,
            SessionState::Anonymous => GuardDecision::Redirect(LOGIN_ROUTE),
            SessionState::Authenticated(user) => {
                if allowed.is_empty() || allowed.contains(&user.role) {
                    GuardDecision::Allow(user)
                } else {
                    GuardDecision::Redirect(LOGIN_ROUTE)
                }
            }
        }
    }

    fn settle_auth(&mut self, result: Result<Option<User>, ApiError>, action: &'static str) -> Result<&Session, ApiError> {
        match result {
            Ok(Some(user)) => {
                info!(user_id = %user.id, role = %user.role, action, "session established");
                self.state = SessionState::Authenticated(user);
                self.user()
                    .ok_or_else(|| ApiError::UnexpectedResponse { detail: format!("{action} left no session") })
            }
            Ok(None) => {
                let err = ApiError::UnexpectedResponse { detail: format!("{action} response carried no user") };
                self.fail_auth(err, action)
            }
            Err(err) => self.fail_auth(err, action),
        }
    }

    fn fail_auth(&mut self, err: ApiError, action: &'static str) -> Result<&Session, ApiError> {
        warn!(error = %err, action, "authentication failed");
        self.error = Some(err.to_string());
        // A current session survives a failed attempt; only an unresolved
        // check settles to anonymous.
        if self.state == SessionState::Checking {
            self.state = SessionState::Anonymous;
        }
        Err(err)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
