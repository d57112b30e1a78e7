// src/config.rs
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const BASE_URL_VAR: &str = "CHATBOT_BASE_URL";
pub const TIMEOUT_VAR: &str = "CHATBOT_TIMEOUT_SECS";
pub const CONNECT_TIMEOUT_VAR: &str = "CHATBOT_CONNECT_TIMEOUT_SECS";

/// Where the chatbot lives and how long to wait for it.
///
/// Timeouts are only applied when configured; unset leaves the transport's
/// own behaviour in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: None,
            connect_timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(BASE_URL_VAR))?;

        Ok(Self {
            base_url: parse_base_url(base_url.trim())?,
            timeout: parse_seconds(TIMEOUT_VAR, lookup(TIMEOUT_VAR))?,
            connect_timeout: parse_seconds(CONNECT_TIMEOUT_VAR, lookup(CONNECT_TIMEOUT_VAR))?,
        })
    }
}

// Relative paths resolve against the last segment of the base, so the base
// always ends in a slash: `http://host/api` must yield `http://host/api/chatbot`.
// Joining discards a query or fragment, so neither is accepted.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
        value: raw.to_string(),
        source,
    })?;

    if url.cannot_be_a_base()
        || !matches!(url.scheme(), "http" | "https")
        || url.query().is_some()
        || url.fragment().is_some()
    {
        return Err(ConfigError::UnsupportedUrl(raw.to_string()));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_seconds(key: &'static str, value: Option<String>) -> Result<Option<Duration>, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| ConfigError::InvalidSeconds { key, value: v }),
        _ => Ok(None),
    }
}
