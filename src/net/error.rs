//! API error taxonomy.
//!
//! ERROR HANDLING
//! ==============
//! Display strings are what the dashboards show in their red banners, so the
//! transport and protocol variants carry fixed user-facing text while the raw
//! cause is kept in a separate field for logs.

pub const UNREACHABLE_MESSAGE: &str = "Cannot reach the server. Make sure the backend is running.";
pub const UNEXPECTED_RESPONSE_MESSAGE: &str =
    "Server returned an unexpected response. Is the backend running on the correct port?";
pub const FALLBACK_SERVER_MESSAGE: &str = "Something went wrong";

/// Errors produced by API client calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("Cannot reach the server. Make sure the backend is running.")]
    Unreachable { detail: String },

    /// The body was not JSON, or not the JSON shape this call expects.
    #[error("Server returned an unexpected response. Is the backend running on the correct port?")]
    UnexpectedResponse { detail: String },

    /// Non-2xx status; `message` is the server's own message when it sent one.
    #[error("{message}")]
    Server { status: u16, message: String },
}

impl ApiError {
    /// Build a server error from a non-2xx status and the decoded body.
    #[must_use]
    pub fn from_status(status: u16, body: &serde_json::Value) -> Self {
        let message = body
            .get("message")
            .and_then(serde_json::Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(FALLBACK_SERVER_MESSAGE)
            .to_owned();
        Self::Server { status, message }
    }

    /// HTTP status for application errors, `None` for transport/protocol.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Unreachable { .. } | Self::UnexpectedResponse { .. } => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
