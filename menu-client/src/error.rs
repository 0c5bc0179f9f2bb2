//! Client error types

use thiserror::Error;

/// Error building a client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP client could not be constructed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Base URL cannot carry path segments
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Result type for client construction
pub type ClientResult<T> = Result<T, ClientError>;

/// Table read failure
#[derive(Debug, Error)]
pub enum ReadError {
    /// No read key configured
    #[error("API key required for reading the spreadsheet")]
    Unauthenticated,

    /// The spreadsheet API rejected the request; carries its message verbatim
    #[error("{0}")]
    Upstream(String),

    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Row write failure
#[derive(Debug, Error)]
pub enum WriteError {
    /// No write token configured
    #[error("Access Token required for writing to Sheets. Please configure it in settings.")]
    Unauthenticated,

    /// The spreadsheet API rejected the write; carries its message verbatim
    #[error("{0}")]
    Upstream(String),

    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Assistant failure. Never shown to users, see [`crate::MenuAssistant::ask`].
#[derive(Debug, Error)]
pub enum AssistantError {
    /// No generation API key configured
    #[error("API key for the assistant not configured")]
    MissingApiKey,

    /// Upstream rejection
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
