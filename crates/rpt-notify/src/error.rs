//! Error types for report mail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    /// Sender or recipient is not a valid mailbox.
    #[error("invalid mail address '{address}': {message}")]
    InvalidAddress { address: String, message: String },

    /// The message could not be assembled.
    #[error("failed to build message: {message}")]
    Build { message: String },

    /// The relay rejected the credentials.
    #[error("SMTP authentication failed: {message}")]
    Auth { message: String },

    /// Connecting to or talking with the relay failed.
    #[error("SMTP delivery failed: {message}")]
    Transport { message: String },
}

impl From<lettre::error::Error> for NotifyError {
    fn from(err: lettre::error::Error) -> Self {
        Self::Build {
            message: err.to_string(),
        }
    }
}

/// Result type for mail operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
