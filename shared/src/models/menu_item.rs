//! Menu Item Model

use serde::{Deserialize, Serialize};

/// Menu item entity (one row of the `Menu` sheet)
///
/// Column order in the sheet: ID, Name, Description, Price, Category,
/// Available, Image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Price as written in the sheet, no currency arithmetic is done on it
    pub price: String,
    /// Free-text grouping label
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub available: bool,
}

impl MenuItem {
    /// Stock label used in listings and the assistant context
    pub fn stock_label(&self) -> &'static str {
        if self.available { "In Stock" } else { "Out of Stock" }
    }
}

/// Update menu item payload
///
/// Fields left as `None` keep the value of the item being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub available: Option<bool>,
}
