use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GapmaError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("Cannot select from an empty population")]
    EmptyPopulation,

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Failures talking to the generative-text service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("Missing credential: environment variable {0} is not set")]
    MissingCredential(String),

    #[error("Oracle call timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("Oracle transport error: {0}")]
    Transport(String),

    #[error("Oracle returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed oracle response: {0}")]
    MalformedResponse(String),
}

impl OracleError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            OracleError::Timeout { .. } | OracleError::Transport(_) => true,
            OracleError::Status { status, .. } => *status == 429 || *status >= 500,
            OracleError::MissingCredential(_) | OracleError::MalformedResponse(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, GapmaError>;
