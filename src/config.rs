//! Client configuration parsed from environment variables.

use std::time::Duration;

pub const DEFAULT_API_ROOT: &str = "http://localhost:5000";
pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 400;
pub const DEFAULT_NOTIFICATION_POLL_SECS: u64 = 30;
pub const DEFAULT_FLASH_SECS: u64 = 3;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid CLASSROOM_API_ROOT '{0}': expected an http:// or https:// URL")]
    InvalidApiRoot(String),
    #[error("CLASSROOM_PAGE_LIMIT must be greater than zero")]
    ZeroPageLimit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server root without the `/api` suffix and without a trailing slash.
    pub api_root: String,
    pub page_limit: u32,
    pub search_debounce: Duration,
    pub notification_poll: Duration,
    pub flash_ttl: Duration,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `CLASSROOM_API_ROOT`: default `http://localhost:5000`
    /// - `CLASSROOM_PAGE_LIMIT`: default 10
    /// - `CLASSROOM_SEARCH_DEBOUNCE_MS`: default 400
    /// - `CLASSROOM_NOTIFICATION_POLL_SECS`: default 30
    /// - `CLASSROOM_FLASH_SECS`: default 3
    ///
    /// # Errors
    ///
    /// Returns an error if the API root is not an http(s) URL or the page
    /// limit is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_root = std::env::var("CLASSROOM_API_ROOT").unwrap_or_else(|_| DEFAULT_API_ROOT.to_owned());
        let config = Self {
            api_root,
            page_limit: env_parse("CLASSROOM_PAGE_LIMIT", DEFAULT_PAGE_LIMIT),
            search_debounce: Duration::from_millis(env_parse(
                "CLASSROOM_SEARCH_DEBOUNCE_MS",
                DEFAULT_SEARCH_DEBOUNCE_MS,
            )),
            notification_poll: Duration::from_secs(env_parse(
                "CLASSROOM_NOTIFICATION_POLL_SECS",
                DEFAULT_NOTIFICATION_POLL_SECS,
            )),
            flash_ttl: Duration::from_secs(env_parse("CLASSROOM_FLASH_SECS", DEFAULT_FLASH_SECS)),
        };
        config.validated()
    }

    /// Defaults pointed at a specific server root.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_root` is not an http(s) URL.
    pub fn with_root(api_root: impl Into<String>) -> Result<Self, ConfigError> {
        Self { api_root: api_root.into(), ..Self::default() }.validated()
    }

    /// Full REST base path: configured root + `/api`.
    #[must_use]
    pub fn api_base(&self) -> String {
        format!("{}/api", self.api_root)
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        let trimmed = self.api_root.trim().trim_end_matches('/');
        let trimmed = trimmed.strip_suffix("/api").unwrap_or(trimmed).to_owned();
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::InvalidApiRoot(self.api_root));
        }
        if self.page_limit == 0 {
            return Err(ConfigError::ZeroPageLimit);
        }
        self.api_root = trimmed;
        Ok(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_root: DEFAULT_API_ROOT.to_owned(),
            page_limit: DEFAULT_PAGE_LIMIT,
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            notification_poll: Duration::from_secs(DEFAULT_NOTIFICATION_POLL_SECS),
            flash_ttl: Duration::from_secs(DEFAULT_FLASH_SECS),
        }
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
