use std::fmt;

/// Error type for solver service operations.
#[derive(Debug, Clone)]
pub enum ClientError {
    /// Network error (connect, timeout, transport)
    Network(String),
    /// HTTP error with status code and raw body
    Http(u16, String),
    /// JSON parsing error
    Parse(String),
    /// Service-reported error (4xx with a `detail` payload)
    Service(String),
    /// Request rejected client-side before any network call
    InvalidRequest(String),
    /// The controller was disposed or re-armed before this operation
    /// resolved; its result was discarded
    Superseded,
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Network(msg) => write!(f, "Network error: {msg}"),
            ClientError::Http(code, msg) => write!(f, "HTTP {code}: {msg}"),
            ClientError::Parse(msg) => write!(f, "Parse error: {msg}"),
            ClientError::Service(msg) => write!(f, "{msg}"),
            ClientError::InvalidRequest(msg) => write!(f, "{msg}"),
            ClientError::Superseded => write!(f, "Operation superseded before completion"),
        }
    }
}

impl std::error::Error for ClientError {}
