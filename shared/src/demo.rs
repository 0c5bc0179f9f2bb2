//! Demonstration data
//!
//! Shown when no read key is configured so the dashboard has something to
//! render without a spreadsheet.

use chrono::{Duration, Local};

use crate::models::{MenuItem, Order, OrderStatus};

/// Fixed sample menu (3 items)
pub fn demo_menu() -> Vec<MenuItem> {
    vec![
        demo_item("1", "Spicy Ramen", "Rich pork broth with chili oil", "14.50", "Mains"),
        demo_item("2", "Gyoza", "Pan-fried dumplings (6pcs)", "8.00", "Appetizers"),
        demo_item("3", "Green Tea Mochi", "Soft rice cake with ice cream", "5.50", "Dessert"),
    ]
}

/// Fixed sample orders (2 orders, newest first)
pub fn demo_orders() -> Vec<Order> {
    let now = Local::now();
    vec![
        Order {
            id: "101".into(),
            items: "2x Spicy Ramen, 1x Gyoza".into(),
            total: "37.00".into(),
            status: OrderStatus::Pending,
            table_number: "4".into(),
            timestamp: now.format("%H:%M:%S").to_string(),
        },
        Order {
            id: "100".into(),
            items: "1x Green Tea Mochi".into(),
            total: "5.50".into(),
            status: OrderStatus::Delivered,
            table_number: "2".into(),
            timestamp: (now - Duration::seconds(1000)).format("%H:%M:%S").to_string(),
        },
    ]
}

fn demo_item(id: &str, name: &str, description: &str, price: &str, category: &str) -> MenuItem {
    MenuItem {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        price: price.into(),
        category: category.into(),
        image_url: None,
        available: true,
    }
}
