//! Radio Browser client error types.

use crate::domain::InvalidFilterTerm;

/// Errors from the Radio Browser client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RadioBrowserError {
    /// Network or service-discovery failure, or a non-2xx HTTP status.
    ///
    /// Retried, with the failing host replaced.
    #[error("error occurred while communicating with the Radio Browser API: {message}")]
    Connection {
        message: String,
        status: Option<u16>,
    },

    /// The request did not complete within the configured timeout.
    #[error("timeout occurred while connecting to the Radio Browser API")]
    Timeout,

    /// The server answered, but not with JSON.
    #[error("unexpected response from the Radio Browser API (status {status}): {body}")]
    Protocol { status: u16, body: String },

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// The client could not be constructed from its configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The query cannot be expressed as a request; nothing was sent.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl RadioBrowserError {
    /// Build a connection error without an HTTP status.
    pub fn connection(message: impl Into<String>) -> Self {
        RadioBrowserError::Connection {
            message: message.into(),
            status: None,
        }
    }

    /// Whether the retry policy should try the request again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RadioBrowserError::Connection { .. })
    }

    /// Whether the cached API host should be dropped and re-discovered.
    pub fn invalidates_host(&self) -> bool {
        matches!(
            self,
            RadioBrowserError::Connection { .. } | RadioBrowserError::Timeout
        )
    }

    /// HTTP status attached to the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            RadioBrowserError::Connection { status, .. } => *status,
            RadioBrowserError::Protocol { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RadioBrowserError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return RadioBrowserError::Timeout;
        }
        RadioBrowserError::Connection {
            message: err.to_string(),
            status: err.status().map(|s| s.as_u16()),
        }
    }
}

impl From<InvalidFilterTerm> for RadioBrowserError {
    fn from(err: InvalidFilterTerm) -> Self {
        RadioBrowserError::InvalidQuery(err.to_string())
    }
}

impl From<url::ParseError> for RadioBrowserError {
    fn from(err: url::ParseError) -> Self {
        RadioBrowserError::connection(format!("invalid request URL: {err}"))
    }
}
