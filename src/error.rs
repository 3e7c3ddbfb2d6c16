use thiserror::Error;

/// Result alias for every call that goes through the HTTP client.
pub type ApiResult<T> = Result<T, ApiError>;

/// ApiError
///
/// The only failure type that leaves the HTTP client. Its `Display` output is the
/// human-readable text pages show to the user as-is; callers never branch on status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered 401. The session has already been torn down by the time
    /// this is returned.
    #[error("{message}")]
    Unauthorized { message: String },

    /// Any other non-2xx status. `message` prefers the server's `error`/`message` field.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The request never reached the backend (connection refused, DNS, reset).
    #[error("Could not connect to the server. Check that the backend is running at {origin}")]
    Unreachable { origin: String },

    /// The request could not be built (malformed URL or header).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A successful response carried a body that is not valid JSON, or JSON of the wrong shape.
    #[error("Invalid response from server: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status carried by the failure, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
