//! Per-view banners: a sticky error and a transient success message.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Clone, Debug)]
struct Flash {
    message: String,
    expires_at: Instant,
}

#[derive(Clone, Debug)]
pub struct Banners {
    error: Option<String>,
    success: Option<Flash>,
    ttl: Duration,
}

impl Banners {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { error: None, success: None, ttl }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn flash_success(&mut self, message: impl Into<String>) {
        self.flash_success_at(message, Instant::now());
    }

    pub fn flash_success_at(&mut self, message: impl Into<String>, now: Instant) {
        self.success = Some(Flash { message: message.into(), expires_at: now + self.ttl });
    }

    #[must_use]
    pub fn success(&self) -> Option<&str> {
        self.success_at(Instant::now())
    }

    /// Success message if it has not expired by `now`.
    #[must_use]
    pub fn success_at(&self, now: Instant) -> Option<&str> {
        self.success
            .as_ref()
            .filter(|f| now < f.expires_at)
            .map(|f| f.message.as_str())
    }

    /// When the current success message expires, if there is one.
    #[must_use]
    pub fn success_deadline(&self) -> Option<Instant> {
        self.success.as_ref().map(|f| f.expires_at)
    }

    /// Drop the success message once it has expired.
    pub fn expire_success(&mut self) {
        self.expire_success_at(Instant::now());
    }

    pub fn expire_success_at(&mut self, now: Instant) {
        if self.success.as_ref().is_some_and(|f| now >= f.expires_at) {
            self.success = None;
        }
    }
}

impl Default for Banners {
    fn default() -> Self {
        Self::new(Duration::from_secs(crate::config::DEFAULT_FLASH_SECS))
    }
}

// =============================================================================
// DELETE CONFIRMATION
// =============================================================================

/// Two-step delete: a row must be armed before its delete can be confirmed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeleteConfirm {
    armed: Option<String>,
}

impl DeleteConfirm {
    /// Arm `key`, disarming any other row.
    pub fn arm(&mut self, key: impl Into<String>) {
        self.armed = Some(key.into());
    }

    pub fn cancel(&mut self) {
        self.armed = None;
    }

    #[must_use]
    pub fn armed(&self) -> Option<&str> {
        self.armed.as_deref()
    }

    /// Consume the arm if it is for `key`.
    pub fn take(&mut self, key: &str) -> bool {
        if self.armed.as_deref() == Some(key) {
            self.armed = None;
            true
        } else {
            false
        }
    }
}
