//! Client configuration from the environment.

use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL without a trailing slash.
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_url(&api_url.into()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `CURDWORKS_API_URL` and `CURDWORKS_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let api_url = std::env::var("CURDWORKS_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout = std::env::var("CURDWORKS_HTTP_TIMEOUT_SECS")
            .ok()
            .map(|raw| parse_timeout(&raw));

        let config = Self::new(api_url);
        match timeout {
            Some(timeout) => config.with_timeout(timeout),
            None => config,
        }
    }
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_timeout(raw: &str) -> Duration {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Duration::from_secs(secs),
        _ => {
            tracing::warn!(value = raw, "invalid CURDWORKS_HTTP_TIMEOUT_SECS; using default");
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        }
    }
}
