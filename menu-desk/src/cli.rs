//! Command-line and environment configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use menu_client::ClientConfig;
use menu_client::config::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_SHEETS_BASE_URL};
use shared::{DEFAULT_SPREADSHEET_ID, SheetConfig};

#[derive(Debug, Parser)]
#[command(name = "menu-desk")]
#[command(about = "Restaurant menu and live order dashboard backed by a spreadsheet")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Spreadsheet holding the Menu and Orders tables
    #[arg(long, env = "SPREADSHEET_ID", default_value = DEFAULT_SPREADSHEET_ID)]
    pub spreadsheet_id: String,

    /// Read credential; demonstration data is shown without it
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Write credential (OAuth bearer token)
    #[arg(long, env = "GOOGLE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub gemini_model: String,

    #[arg(long, env = "SHEETS_BASE_URL", default_value = DEFAULT_SHEETS_BASE_URL)]
    pub sheets_base_url: String,

    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    pub gemini_base_url: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = "MENU_DESK_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Directory for the daily-rolling log file
    #[arg(long, env = "MENU_DESK_LOG_DIR", default_value = "./logs")]
    pub log_dir: PathBuf,

    /// Confirm the target row still holds the edited item before writing
    #[arg(long, env = "MENU_DESK_VERIFY_ROW_IDENTITY")]
    pub verify_row_identity: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Interactive dashboard (default)
    Tui,
    /// Poll headless, log new orders and ring the terminal bell
    Watch,
    /// Ask the menu assistant a single question
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Tui)
    }

    /// Initial connection settings
    pub fn sheet_config(&self) -> SheetConfig {
        let mut config = SheetConfig::new(self.spreadsheet_id.trim());
        if let Some(key) = &self.api_key {
            config = config.with_api_key(key.trim());
        }
        if let Some(token) = &self.access_token {
            config = config.with_access_token(token.trim());
        }
        config
    }

    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new()
            .with_sheets_base_url(&self.sheets_base_url)
            .with_gemini_base_url(&self.gemini_base_url)
            .with_gemini_model(&self.gemini_model)
            .with_timeout(self.timeout_secs);

        match self.gemini_api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => config.with_gemini_api_key(key),
            _ => config,
        }
    }
}
