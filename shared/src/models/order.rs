//! Order Model

use serde::{Deserialize, Serialize};

/// Order status
///
/// Ordered by kitchen progress. The sheet is authoritative; transitions are
/// never validated locally.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::Ready => "Ready",
            OrderStatus::Delivered => "Delivered",
        }
    }

    /// Parse a status cell. Blank or unrecognised cells read as `Pending`.
    pub fn from_cell(cell: &str) -> Self {
        match cell.trim().to_ascii_lowercase().as_str() {
            "preparing" => OrderStatus::Preparing,
            "ready" => OrderStatus::Ready,
            "delivered" => OrderStatus::Delivered,
            "pending" | "" => OrderStatus::Pending,
            other => {
                tracing::debug!(status = %other, "Unrecognised order status, treating as Pending");
                OrderStatus::Pending
            }
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Order entity (one row of the `Orders` sheet)
///
/// Column order in the sheet: ID, Items, Total, Status, Table, Timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// Free-text items description, e.g. "2x Spicy Ramen, 1x Gyoza"
    pub items: String,
    pub total: String,
    pub status: OrderStatus,
    pub table_number: String,
    /// Display only, never compared
    pub timestamp: String,
}

impl Order {
    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_cell() {
        assert_eq!(OrderStatus::from_cell("Ready"), OrderStatus::Ready);
        assert_eq!(OrderStatus::from_cell(" preparing "), OrderStatus::Preparing);
        assert_eq!(OrderStatus::from_cell("DELIVERED"), OrderStatus::Delivered);
        assert_eq!(OrderStatus::from_cell(""), OrderStatus::Pending);
        assert_eq!(OrderStatus::from_cell("Cancelled"), OrderStatus::Pending);
    }

    #[test]
    fn test_status_ordering() {
        assert!(OrderStatus::Pending < OrderStatus::Preparing);
        assert!(OrderStatus::Preparing < OrderStatus::Ready);
        assert!(OrderStatus::Ready < OrderStatus::Delivered);
    }

    #[test]
    fn test_status_serde_uses_display_names() {
        assert_eq!(serde_json::to_string(&OrderStatus::Ready).unwrap(), "\"Ready\"");
        assert_eq!(OrderStatus::Delivered.to_string(), "Delivered");
    }
}
