//! Client configuration.
//!
//! # Design
//! The API key is the only credential the remote service checks; it travels
//! as the last path segment of every URL. Username and password are kept for
//! callers that already have them but are never sent. The base URL defaults
//! to the public endpoint and is only overridden to reach a mirror or the
//! mock server.

use std::fmt;
use std::time::Duration;

use crate::error::{ApiError, Result};

/// Public Nozbe API endpoint.
pub const DEFAULT_API_URL: &str = "https://webapp.nozbe.com/api";

pub const ENV_API_KEY: &str = "NOZBE_API_KEY";
pub const ENV_API_URL: &str = "NOZBE_API_URL";
pub const ENV_USERNAME: &str = "NOZBE_USERNAME";
pub const ENV_PASSWORD: &str = "NOZBE_PASSWORD";

#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub api_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Overall per-request timeout. `None` leaves it to the HTTP layer.
    pub timeout: Option<Duration>,
    /// Percent-encode positional and named segment values. Off by default,
    /// which joins values verbatim.
    pub percent_encode_segments: bool,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            username: None,
            password: None,
            timeout: None,
            percent_encode_segments: false,
        }
    }

    /// Read the configuration from `NOZBE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env`, with the variable lookup supplied by the caller.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(ENV_API_KEY)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ApiError::Config(format!("{ENV_API_KEY} is not set")))?;

        let mut config = Self::new(api_key);
        if let Some(url) = lookup(ENV_API_URL).filter(|url| !url.is_empty()) {
            config = config.with_api_url(&url);
        }
        config.username = lookup(ENV_USERNAME);
        config.password = lookup(ENV_PASSWORD);
        Ok(config)
    }

    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_credentials(mut self, username: Option<String>, password: Option<String>) -> Self {
        self.username = username;
        self.password = password;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_percent_encoding(mut self, enabled: bool) -> Self {
        self.percent_encode_segments = enabled;
        self
    }

    /// Reject configurations that cannot produce a usable URL.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            tracing::error!("API key must be provided");
            return Err(ApiError::MissingParameter("api_key"));
        }
        if self.api_url.is_empty() {
            return Err(ApiError::Config("api_url is empty".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"***")
            .field("api_url", &self.api_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .field("percent_encode_segments", &self.percent_encode_segments)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn new_uses_public_endpoint() {
        let config = ClientConfig::new("abc");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.timeout.is_none());
        assert!(!config.percent_encode_segments);
    }

    #[test]
    fn trailing_slash_is_stripped_from_api_url() {
        let config = ClientConfig::new("abc").with_api_url("http://localhost:3000/api/");
        assert_eq!(config.api_url, "http://localhost:3000/api");
    }

    #[test]
    fn empty_key_is_a_missing_parameter() {
        let err = ClientConfig::new("").validate().unwrap_err();
        assert!(matches!(err, ApiError::MissingParameter("api_key")));
    }

    #[test]
    fn from_lookup_reads_all_variables() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (ENV_API_KEY, "k1"),
            (ENV_API_URL, "http://mirror/api/"),
            (ENV_USERNAME, "me"),
            (ENV_PASSWORD, "secret"),
        ]))
        .unwrap();
        assert_eq!(config.api_key, "k1");
        assert_eq!(config.api_url, "http://mirror/api");
        assert_eq!(config.username.as_deref(), Some("me"));
        assert_eq!(config.password.as_deref(), Some("secret"));
    }

    #[test]
    fn from_lookup_without_key_fails() {
        let err = ClientConfig::from_lookup(lookup_from(&[(ENV_API_URL, "http://x")])).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn debug_hides_secrets() {
        let config = ClientConfig::new("topsecretkey")
            .with_credentials(Some("me".to_string()), Some("hunter2".to_string()));
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("topsecretkey"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("me"));
    }
}
