//! Spreadsheet connection settings

use serde::{Deserialize, Serialize};

/// Spreadsheet used when none is configured
pub const DEFAULT_SPREADSHEET_ID: &str = "1ePvk-ymLkxspbWYNSryAMD_5juQubmEDMKAmjpiTpiM";

/// Sheet holding the menu rows
pub const SHEET_MENU: &str = "Menu";
/// Sheet holding the order log
pub const SHEET_ORDERS: &str = "Orders";

/// Connection settings entered by staff
///
/// Reads need only `api_key`. Writes additionally need `access_token`.
/// Without a read key the dashboard runs in demonstration mode.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetConfig {
    pub spreadsheet_id: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Short-lived OAuth2 token for writing
    #[serde(default)]
    pub access_token: Option<String>,
}

impl SheetConfig {
    pub fn new(spreadsheet_id: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            api_key: None,
            access_token: None,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Read key, blank strings count as absent
    pub fn read_key(&self) -> Option<&str> {
        non_blank(self.api_key.as_deref())
    }

    /// Write token, blank strings count as absent
    pub fn write_token(&self) -> Option<&str> {
        non_blank(self.access_token.as_deref())
    }

    pub fn has_read_key(&self) -> bool {
        self.read_key().is_some()
    }

    pub fn has_write_token(&self) -> bool {
        self.write_token().is_some()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SPREADSHEET_ID)
    }
}

// Credentials never reach the logs
impl std::fmt::Debug for SheetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetConfig")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .finish()
    }
}
