//! Data models
//!
//! Records are rebuilt from raw spreadsheet rows on every read; nothing here
//! performs I/O.

pub mod menu_item;
pub mod order;
pub mod sheet_config;

// Re-exports
pub use menu_item::*;
pub use order::*;
pub use sheet_config::*;
