use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://train.v1.courtapi.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{0} is required")]
    MissingCredential(&'static str),
    #[error("invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[cfg(feature = "http")]
    #[error("HTTP client setup failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Connection settings and credentials for one invocation.
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub app_id: String,
    pub app_secret: String,
    /// Per-request timeout. Upstream purchases can be slow.
    pub timeout: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    /// `base_url` should be like `https://train.v1.courtapi.com`; a trailing
    /// slash is dropped.
    pub fn new(
        base_url: impl Into<String>,
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check that both credentials are present.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.app_id.trim().is_empty() {
            return Err(ClientError::MissingCredential("appId"));
        }
        if self.app_secret.trim().is_empty() {
            return Err(ClientError::MissingCredential("appSecret"));
        }
        if self.base_url.is_empty() {
            return Err(ClientError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: "empty".into(),
            });
        }
        Ok(())
    }
}
