//! Row mapping between raw sheet tables and domain records
//!
//! Reads are total: any table shape maps to some sequence of records, with
//! missing cells filled from defaults. The first row is always the header.

use shared::{MenuItem, MenuItemUpdate, Order, OrderStatus, SHEET_MENU};

/// First and last column of a menu row (ID .. Image)
const MENU_FIRST_COLUMN: char = 'A';
const MENU_LAST_COLUMN: char = 'G';

/// Rows above the first data row (the header)
const HEADER_ROWS: usize = 1;

fn cell(row: &[String], idx: usize) -> Option<&str> {
    row.get(idx).map(String::as_str).filter(|c| !c.is_empty())
}

fn cell_or(row: &[String], idx: usize, default: &str) -> String {
    cell(row, idx).unwrap_or(default).to_string()
}

/// Map a `Menu` table (ID, Name, Description, Price, Category, Available, Image)
pub fn map_menu_rows(rows: &[Vec<String>]) -> Vec<MenuItem> {
    if rows.len() < 2 {
        return Vec::new();
    }

    rows.iter()
        .skip(HEADER_ROWS)
        .enumerate()
        .map(|(index, row)| MenuItem {
            id: cell(row, 0)
                .map(str::to_string)
                .unwrap_or_else(|| format!("item-{index}")),
            name: cell_or(row, 1, "Unknown Item"),
            description: cell_or(row, 2, ""),
            price: cell_or(row, 3, "0"),
            category: cell_or(row, 4, "General"),
            available: cell(row, 5).is_none_or(|c| c.eq_ignore_ascii_case("TRUE")),
            image_url: cell(row, 6).map(str::to_string),
        })
        .collect()
}

/// Map an `Orders` table (ID, Items, Total, Status, Table, Timestamp), newest first
pub fn map_order_rows(rows: &[Vec<String>]) -> Vec<Order> {
    if rows.len() < 2 {
        return Vec::new();
    }

    let mut orders: Vec<Order> = rows
        .iter()
        .skip(HEADER_ROWS)
        .enumerate()
        .map(|(index, row)| Order {
            id: cell(row, 0)
                .map(str::to_string)
                .unwrap_or_else(|| format!("ord-{index}")),
            items: cell_or(row, 1, ""),
            total: cell_or(row, 2, "0"),
            status: cell(row, 3).map(OrderStatus::from_cell).unwrap_or_default(),
            table_number: cell_or(row, 4, "?"),
            timestamp: cell(row, 5)
                .map(str::to_string)
                .unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
        })
        .collect();

    orders.reverse();
    orders
}

fn pick(delta: &Option<String>, original: &str) -> String {
    match delta.as_deref() {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => original.to_string(),
    }
}

fn bool_cell(value: bool) -> String {
    if value { "TRUE" } else { "FALSE" }.to_string()
}

/// Full replacement row for one menu item
///
/// Each column comes from `delta` when it carries a non-empty value, else
/// from `original`.
pub fn build_menu_row(original: &MenuItem, delta: &MenuItemUpdate) -> Vec<String> {
    let image = match delta.image_url.as_deref() {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => original.image_url.clone().unwrap_or_default(),
    };

    vec![
        pick(&delta.id, &original.id),
        pick(&delta.name, &original.name),
        pick(&delta.description, &original.description),
        pick(&delta.price, &original.price),
        pick(&delta.category, &original.category),
        bool_cell(delta.available.unwrap_or(original.available)),
        image,
    ]
}

/// One-based sheet row holding the menu item at `position`
pub fn menu_sheet_row(position: usize) -> usize {
    position + HEADER_ROWS + 1
}

/// Range covering the full row of the menu item at `position`, e.g. `Menu!A2:G2`
pub fn menu_row_range(position: usize) -> String {
    let row = menu_sheet_row(position);
    format!("{SHEET_MENU}!{MENU_FIRST_COLUMN}{row}:{MENU_LAST_COLUMN}{row}")
}
