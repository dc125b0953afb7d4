//! Error types for the Cafe SDK.
//!
//! Bootstrap failures get their own variants so a script can tell "the sidecar
//! is not there" apart from "one call failed".

use thiserror::Error;
use tonic::Code;

/// Main error type for the SDK.
#[derive(Debug, Error)]
pub enum SdkError {
    // Bootstrap errors
    #[error("Invalid sidecar address {address}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: tonic::transport::Error,
    },

    #[error("Failed to connect to sidecar at {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: tonic::transport::Error,
    },

    // Per-call errors
    #[error("Call cancelled")]
    Cancelled,

    #[error("Call deadline exceeded")]
    DeadlineExceeded,

    #[error("{method} failed ({code:?}): {message}")]
    Rpc {
        method: &'static str,
        code: Code,
        message: String,
    },

    // Local encoding errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },
}

/// Result type alias for SDK operations.
pub type Result<T> = std::result::Result<T, SdkError>;

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl SdkError {
    /// Translate a gRPC status returned by `method`.
    ///
    /// Cancellation and deadline statuses collapse into the same variants the
    /// local call context produces, so callers match on one shape.
    pub fn from_status(method: &'static str, status: tonic::Status) -> Self {
        match status.code() {
            Code::Cancelled => SdkError::Cancelled,
            Code::DeadlineExceeded => SdkError::DeadlineExceeded,
            code => SdkError::Rpc {
                method,
                code,
                message: status.message().to_string(),
            },
        }
    }

    /// Whether the sidecar could not be reached at construction time.
    pub fn is_bootstrap(&self) -> bool {
        matches!(
            self,
            SdkError::Connect { .. } | SdkError::InvalidAddress { .. }
        )
    }

    /// Check if a caller may reasonably retry the failed call.
    ///
    /// The SDK never retries on its own; `push_data` in particular is
    /// at-most-once per invocation.
    pub fn is_retryable(&self) -> bool {
        match self {
            SdkError::DeadlineExceeded => true,
            SdkError::Rpc { code, .. } => matches!(
                code,
                Code::Unavailable | Code::ResourceExhausted | Code::Aborted
            ),
            _ => false,
        }
    }

    /// The gRPC status code behind this error, if the peer produced one.
    pub fn code(&self) -> Option<Code> {
        match self {
            SdkError::Rpc { code, .. } => Some(*code),
            SdkError::Cancelled => Some(Code::Cancelled),
            SdkError::DeadlineExceeded => Some(Code::DeadlineExceeded),
            _ => None,
        }
    }
}
