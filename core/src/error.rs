//! Error types for the Nozbe API client.
//!
//! # Design
//! Usage errors (`UnsupportedAction`, `MissingParameter`) fail fast and are
//! logged by the caller site before being returned. `Transport` and `Http`
//! carry whatever the HTTP layer reported and always reach the caller. A
//! body that is not valid JSON has no variant here: `NozbeClient::fetch`
//! swallows it and yields an empty list.

/// Errors returned by `NozbeClient`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The action name is not one of the whitelisted remote actions.
    #[error("unsupported action: {0}")]
    UnsupportedAction(String),

    /// A required argument was not supplied.
    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    /// No project matched the given name where one was required.
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    /// The request never produced a response (connect, timeout, IO).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The client configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// True for a 404 response from the server.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }

    /// True for a 401 response, which is what the API returns for a bad key.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status: 401, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_status_and_body() {
        let err = ApiError::Http {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 500: boom");
    }

    #[test]
    fn status_helpers() {
        let not_found = ApiError::Http {
            status: 404,
            body: String::new(),
        };
        assert!(not_found.is_not_found());
        assert!(!not_found.is_unauthorized());
        assert!(!ApiError::MissingParameter("id").is_not_found());
    }
}
