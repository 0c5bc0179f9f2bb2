//! Menu Client - adapters for the spreadsheet and the menu assistant
//!
//! - [`sheets`]: reads whole tables and overwrites single rows through the
//!   spreadsheet values API
//! - [`mapping`]: pure conversion between raw rows and domain records
//! - [`assistant`]: answers diner questions with the current menu as context

pub mod assistant;
pub mod config;
pub mod error;
pub mod mapping;
pub mod sheets;

pub use assistant::{
    ChatBackend, ChatMessage, ChatRequest, ChatRole, ChatSession, ChatTurn, EMPTY_REPLY,
    FALLBACK_REPLY, GREETING, GeminiBackend, MenuAssistant, Speaker,
};
pub use config::ClientConfig;
pub use error::{AssistantError, ClientError, ClientResult, ReadError, WriteError};
pub use mapping::{build_menu_row, map_menu_rows, map_order_rows, menu_row_range};
pub use sheets::{RawTable, SheetsClient, SheetsService, TableSource};

// Re-export shared types for convenience
pub use shared::{MenuItem, MenuItemUpdate, Order, OrderStatus, SheetConfig};
