use thiserror::Error;

/// Maximum characters to include in error message body for debugging.
pub(crate) const MAX_ERROR_BODY_CHARS: usize = 200;

/// Errors that can occur when using the STS client.
#[derive(Debug, Error)]
pub enum StsError {
    /// The trailing call arguments do not form a valid call shape.
    ///
    /// Raised synchronously at the call site, never through a callback.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Validation error for request parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// HTTP/network layer error from reqwest.
    #[error("HTTP request failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Unexpected HTTP response (non-JSON error body).
    #[error("HTTP error: {0}")]
    Http(String),

    /// STS returned a service error.
    #[error("API error (RequestId: {}): [{code}] {message}", .request_id.as_deref().unwrap_or("-"))]
    Api {
        request_id: Option<String>,
        code: String,
        message: String,
        /// `Sender` or `Receiver`, when the service reports it.
        kind: Option<String>,
    },

    /// Response deserialization error.
    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// No way to authenticate a request that requires it.
    #[error("credential error: {0}")]
    Credential(String),

    /// Client configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// The call was aborted through its abort signal.
    #[error("request aborted")]
    Aborted,

    /// Failure reported by a custom transport.
    #[error("transport error: {0}")]
    Transport(String),
}

impl StsError {
    /// Returns `true` if the error is potentially recoverable by retrying.
    ///
    /// This only classifies; the client itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            StsError::HttpClient(e) => e.is_timeout() || e.is_connect(),
            StsError::Http(_) => true,

            StsError::Api { code, kind, .. } => {
                matches!(
                    code.as_str(),
                    "Throttling"
                        | "ThrottlingException"
                        | "RequestLimitExceeded"
                        | "IDPCommunicationError"
                        | "ServiceUnavailable"
                        | "InternalFailure"
                ) || kind.as_deref() == Some("Receiver")
            }

            StsError::InvalidArgument(_)
            | StsError::Validation(_)
            | StsError::Deserialize(_)
            | StsError::Credential(_)
            | StsError::Config(_)
            | StsError::Aborted
            | StsError::Transport(_) => false,
        }
    }

    /// Returns the request ID if this is an API error that carried one.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            StsError::Api { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }

    /// Returns the error code if this is an API error.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            StsError::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// A specialized Result type for STS operations.
pub type Result<T> = std::result::Result<T, StsError>;

/// Truncates a string to at most `max_chars` characters on a valid UTF-8 boundary.
pub(crate) fn truncate_str(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
