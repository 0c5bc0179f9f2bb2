//! Shared types for MenuDesk
//!
//! Domain records read from the spreadsheet (menu items, orders), the
//! connection settings, and the fixed demonstration data shown when no
//! read key is configured.

pub mod demo;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    DEFAULT_SPREADSHEET_ID, MenuItem, MenuItemUpdate, Order, OrderStatus, SHEET_MENU,
    SHEET_ORDERS, SheetConfig,
};
