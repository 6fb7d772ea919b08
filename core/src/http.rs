//! HTTP transport seam.
//!
//! # Design
//! Requests and responses are plain data. `NozbeClient` builds an
//! `HttpRequest`, hands it to its `Transport`, and interprets the returned
//! `HttpResponse` itself, so status handling and JSON decoding never depend
//! on which HTTP library sits underneath. The transport is owned by the
//! client and dropped with it; there is no process-wide session.

use std::fmt;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};

const USER_AGENT: &str = concat!("nozbe-rs/", env!("CARGO_PKG_VERSION"));

/// A GET request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(url: &str) -> Self {
        Self {
            url: url.to_string(),
            headers: vec![("user-agent".to_string(), USER_AGENT.to_string())],
        }
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First value of the named header, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Executes requests on behalf of `NozbeClient`.
///
/// Implementations return `Ok` for every response the server produced,
/// whatever its status, and `ApiError::Transport` when no response arrived.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a pooled `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        // Statuses are interpreted by the client, not turned into errors here.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.timeout)
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.agent.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder
            .call()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let bytes = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_request_carries_user_agent() {
        let req = HttpRequest::get("http://localhost/api/projects/key-k");
        assert_eq!(req.url, "http://localhost/api/projects/key-k");
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.headers[0].0, "user-agent");
        assert!(req.headers[0].1.starts_with("nozbe-rs/"));
    }

    #[test]
    fn success_range() {
        assert!(HttpResponse::ok("[]").is_success());
        let mut resp = HttpResponse::ok("");
        resp.status = 204;
        assert!(resp.is_success());
        resp.status = 302;
        assert!(!resp.is_success());
        resp.status = 500;
        assert!(!resp.is_success());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let mut resp = HttpResponse::ok("");
        resp.headers = vec![
            ("content-type".to_string(), "text/html".to_string()),
            ("Content-Type".to_string(), "application/json".to_string()),
        ];
        assert_eq!(resp.header("Content-Type"), Some("text/html"));
        assert_eq!(resp.header("CONTENT-TYPE"), Some("text/html"));
        assert_eq!(resp.header("etag"), None);
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = ClientConfig::new("k").with_timeout(Duration::from_secs(2));
        let transport = UreqTransport::from_config(&config);
        let url = format!("http://127.0.0.1:{port}/api/projects/key-k");
        let err = transport.execute(&HttpRequest::get(&url)).unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
