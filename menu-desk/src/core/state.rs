//! Snapshot of the dashboard state

use shared::{MenuItem, Order};

/// Whether a refresh was asked for by a person or by the poller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// Startup or user-triggered; toggles the loading indicator
    Foreground,
    /// Timer-triggered; silent
    Background,
}

impl RefreshMode {
    pub fn is_foreground(&self) -> bool {
        matches!(self, RefreshMode::Foreground)
    }
}

/// In-memory copy of the menu and orders as of the last successful read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub menu: Vec<MenuItem>,
    /// Newest first
    pub orders: Vec<Order>,
    /// Order count observed by the previous read
    pub last_order_count: usize,
    /// Orders that arrived since the previous read, until dismissed
    pub new_orders: Vec<Order>,
    pub loading: bool,
    /// Connection error banner
    pub error: Option<String>,
}

impl Snapshot {
    /// Replace both arrays with a fresh read and run new-order detection.
    ///
    /// Returns the orders flagged as new by this read (empty when none).
    /// `last_order_count` always follows the fresh count, so a shrinking
    /// order log just lowers the baseline.
    pub fn apply_read(&mut self, menu: Vec<MenuItem>, orders: Vec<Order>) -> &[Order] {
        let arrived = detect_new_orders(self.last_order_count, &orders);
        let flagged = !arrived.is_empty();
        if flagged {
            self.new_orders = arrived;
        }

        self.last_order_count = orders.len();
        self.menu = menu;
        self.orders = orders;

        if flagged { &self.new_orders[..] } else { &[] }
    }

    /// Orders still waiting on the kitchen
    pub fn pending_count(&self) -> usize {
        self.orders.iter().filter(|o| o.is_pending()).count()
    }

    pub fn menu_position(&self, item_id: &str) -> Option<usize> {
        self.menu.iter().position(|item| item.id == item_id)
    }
}

/// Leading `fresh - previous` orders of a newest-first list, when it grew
pub fn detect_new_orders(previous_count: usize, orders: &[Order]) -> Vec<Order> {
    if orders.len() > previous_count {
        orders[..orders.len() - previous_count].to_vec()
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::OrderStatus;

    fn orders(ids: &[&str]) -> Vec<Order> {
        ids.iter()
            .map(|id| Order {
                id: id.to_string(),
                items: format!("items {id}"),
                total: "1".into(),
                status: OrderStatus::Pending,
                table_number: "1".into(),
                timestamp: "12:00".into(),
            })
            .collect()
    }

    #[test]
    fn test_growth_flags_leading_orders() {
        let fresh = orders(&["e", "d", "c", "b", "a"]);
        let flagged = detect_new_orders(2, &fresh);
        let ids: Vec<&str> = flagged.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["e", "d", "c"]);
    }

    #[test]
    fn test_shrink_flags_nothing_and_lowers_baseline() {
        let mut snapshot = Snapshot {
            last_order_count: 5,
            ..Default::default()
        };
        let flagged = snapshot.apply_read(Vec::new(), orders(&["c", "b", "a"])).len();
        assert_eq!(flagged, 0);
        assert_eq!(snapshot.last_order_count, 3);
        assert!(snapshot.new_orders.is_empty());
    }

    #[test]
    fn test_equal_count_keeps_previous_alert() {
        let mut snapshot = Snapshot::default();
        snapshot.apply_read(Vec::new(), orders(&["b", "a"]));
        assert_eq!(snapshot.new_orders.len(), 2);

        let flagged = snapshot.apply_read(Vec::new(), orders(&["b", "a"])).len();
        assert_eq!(flagged, 0);
        assert_eq!(snapshot.new_orders.len(), 2);
    }

    #[test]
    fn test_next_detection_supersedes_alert() {
        let mut snapshot = Snapshot::default();
        snapshot.apply_read(Vec::new(), orders(&["a"]));
        snapshot.apply_read(Vec::new(), orders(&["c", "b", "a"]));
        let ids: Vec<&str> = snapshot.new_orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);
    }

    #[test]
    fn test_pending_count() {
        let mut list = orders(&["b", "a"]);
        list[1].status = OrderStatus::Ready;
        let snapshot = Snapshot {
            orders: list,
            ..Default::default()
        };
        assert_eq!(snapshot.pending_count(), 1);
    }
}
