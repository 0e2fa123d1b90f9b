//! Error types for tripcal.

use thiserror::Error;

/// Errors that can occur while converting or syncing a feed.
#[derive(Error, Debug)]
pub enum TripCalError {
    #[error("{0}")]
    InvalidUrl(String),

    #[error("{0}")]
    InvalidTimeout(String),

    #[error("Missing or malformed bearer credential")]
    MissingCredential,

    #[error("Request timed out after {0} seconds")]
    FeedTimeout(u64),

    #[error("Failed to fetch iCal feed. HTTP Status: {0}")]
    FeedStatus(u16),

    #[error("Error fetching iCal feed: {0}")]
    FeedRequest(String),

    #[error("Failed to parse iCal data: {0}")]
    IcsParse(String),

    #[error("Remote table error: {0}")]
    Table(String),

    #[error("Remote table precondition failed")]
    TablePreconditionFailed,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TripCalError {
    /// Whether this error means the table changed between fetch and commit.
    pub fn is_precondition_failed(&self) -> bool {
        matches!(self, TripCalError::TablePreconditionFailed)
    }

    /// Input errors are raised before any network call is made.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            TripCalError::InvalidUrl(_)
                | TripCalError::InvalidTimeout(_)
                | TripCalError::MissingCredential
        )
    }
}

impl From<serde_json::Error> for TripCalError {
    fn from(err: serde_json::Error) -> Self {
        TripCalError::Serialization(err.to_string())
    }
}

/// Result type alias for tripcal operations.
pub type TripCalResult<T> = Result<T, TripCalError>;
