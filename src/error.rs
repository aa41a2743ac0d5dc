use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse failure category shown to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Validation,
    Network,
    Timeout,
    Backend,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    #[error("{0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("Backend returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),
}

impl ResponseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Network(_) => ErrorKind::Network,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Api { .. } | Self::MalformedResponse(_) => ErrorKind::Backend,
        }
    }

    /// Server-side (5xx) API failures, transport failures and timeouts may
    /// succeed on a later attempt. Bad input and contract violations never do.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Validation(_) | Self::MalformedResponse(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ResponseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            ResponseError::Validation("x".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(ResponseError::Network("x".into()).kind(), ErrorKind::Network);
        assert_eq!(
            ResponseError::Timeout { timeout_ms: 5000 }.kind(),
            ErrorKind::Timeout
        );
        assert_eq!(
            ResponseError::Api {
                status: 404,
                message: "x".into()
            }
            .kind(),
            ErrorKind::Backend
        );
        assert_eq!(
            ResponseError::MalformedResponse("x".into()).kind(),
            ErrorKind::Backend
        );
    }

    #[test]
    fn test_retryable_policy() {
        assert!(ResponseError::Network("refused".into()).is_retryable());
        assert!(ResponseError::Timeout { timeout_ms: 5000 }.is_retryable());
        assert!(
            ResponseError::Api {
                status: 500,
                message: "boom".into()
            }
            .is_retryable()
        );
        assert!(
            ResponseError::Api {
                status: 503,
                message: "unavailable".into()
            }
            .is_retryable()
        );
        assert!(
            !ResponseError::Api {
                status: 429,
                message: "slow down".into()
            }
            .is_retryable()
        );
        assert!(!ResponseError::Validation("empty".into()).is_retryable());
        assert!(!ResponseError::MalformedResponse("no content".into()).is_retryable());
    }
}
