//! Client configuration

use std::time::Duration;

use crate::{ClientError, ClientResult};

/// Public spreadsheet API endpoint
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";
/// Public generation API endpoint
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Model used by the menu assistant
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";

/// Client configuration for the spreadsheet and assistant endpoints
#[derive(Clone)]
pub struct ClientConfig {
    /// Spreadsheet API base URL (e.g., "https://sheets.googleapis.com")
    pub sheets_base_url: String,

    /// Generation API base URL
    pub gemini_base_url: String,

    /// Generation model identifier
    pub gemini_model: String,

    /// Generation API key
    pub gemini_api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a configuration pointing at the public endpoints
    pub fn new() -> Self {
        Self {
            sheets_base_url: DEFAULT_SHEETS_BASE_URL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_api_key: None,
            timeout: 30,
        }
    }

    /// Set the spreadsheet API base URL
    pub fn with_sheets_base_url(mut self, url: impl Into<String>) -> Self {
        self.sheets_base_url = url.into();
        self
    }

    /// Set the generation API base URL
    pub fn with_gemini_base_url(mut self, url: impl Into<String>) -> Self {
        self.gemini_base_url = url.into();
        self
    }

    /// Set the generation model
    pub fn with_gemini_model(mut self, model: impl Into<String>) -> Self {
        self.gemini_model = model.into();
        self
    }

    /// Set the generation API key
    pub fn with_gemini_api_key(mut self, key: impl Into<String>) -> Self {
        self.gemini_api_key = Some(key.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Build the underlying reqwest client
    pub fn build_http(&self) -> ClientResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout))
            .build()
            .map_err(ClientError::from)
    }

    /// Create a spreadsheet client from this configuration
    pub fn build_sheets_client(&self) -> ClientResult<super::SheetsClient> {
        super::SheetsClient::new(self)
    }

    /// Create a generation backend from this configuration
    pub fn build_gemini_backend(&self) -> ClientResult<super::GeminiBackend> {
        super::GeminiBackend::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("sheets_base_url", &self.sheets_base_url)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("gemini_model", &self.gemini_model)
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .finish()
    }
}
