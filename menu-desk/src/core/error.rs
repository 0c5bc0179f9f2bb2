//! Core error types

use thiserror::Error;

use menu_client::{ClientError, ReadError, WriteError};

/// Banner text shown when a refresh fails
pub const CONNECTION_FAILED_MESSAGE: &str = "Connection failed. Check Settings.";

/// A refresh could not read both tables
#[derive(Debug, Error)]
#[error("Connection failed. Check Settings.")]
pub struct ConnectionError {
    #[source]
    pub source: ReadError,
}

impl From<ReadError> for ConnectionError {
    fn from(source: ReadError) -> Self {
        Self { source }
    }
}

/// Saving a menu edit failed
#[derive(Debug, Error)]
pub enum EditError {
    #[error("Cannot save: No Google Access Token provided in Settings.")]
    MissingCredential,

    #[error("{0}")]
    UpstreamRejected(String),

    #[error("Item {0} is no longer on the menu")]
    RowNotFound(String),
}

impl From<WriteError> for EditError {
    fn from(err: WriteError) -> Self {
        match err {
            WriteError::Unauthenticated => EditError::MissingCredential,
            other => EditError::UpstreamRejected(other.to_string()),
        }
    }
}

/// Startup and terminal failures
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}
