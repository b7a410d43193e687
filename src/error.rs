//! Error types for quotevox

use thiserror::Error;

/// Result type alias for quotevox operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in quotevox
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed base64 payload
    #[error("base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Audio input the encoder cannot represent (zero sample rate,
    /// odd-length PCM payload, data section too large for the header)
    #[error("invalid audio input: {0}")]
    InvalidSample(String),

    /// HTTP transport error (retryable)
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status (retryable)
    #[error("http status {status}: {body}")]
    Status {
        /// Status code returned by the remote endpoint
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// Response parsed but does not have the expected shape (not retried)
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// All retry attempts failed; carries the last underlying error
    #[error("retries exhausted after {attempts} attempts: {source}")]
    RetryExhausted {
        /// Number of attempts performed
        attempts: u32,
        /// Last error observed before giving up
        #[source]
        source: Box<Error>,
    },

    /// Serialization error (retryable when it is the response envelope)
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is transient and worth retrying.
    ///
    /// Transport failures, non-success statuses, and unparsable response
    /// envelopes are transient; everything else indicates a contract
    /// violation and must surface immediately.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Status { .. } | Self::Serialization(_)
        )
    }
}
