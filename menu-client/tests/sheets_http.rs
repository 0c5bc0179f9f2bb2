//! Spreadsheet client against a local mock server

use std::sync::Arc;

use menu_client::{
    ClientConfig, MenuItem, MenuItemUpdate, OrderStatus, ReadError, SheetConfig, SheetsClient,
    SheetsService, TableSource, WriteError,
};
use mockito::{Matcher, Server};
use serde_json::json;

fn sheet_config() -> SheetConfig {
    SheetConfig::new("sheet-1")
        .with_api_key("read-key")
        .with_access_token("write-token")
}

fn client_for(server: &Server) -> SheetsClient {
    ClientConfig::new()
        .with_sheets_base_url(server.url())
        .with_timeout(5)
        .build_sheets_client()
        .unwrap()
}

#[tokio::test]
async fn test_read_table_returns_raw_rows() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v4/spreadsheets/sheet-1/values/Menu")
        .match_query(Matcher::UrlEncoded("key".into(), "read-key".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "range": "Menu!A1:G3",
                "majorDimension": "ROWS",
                "values": [
                    ["ID", "Name", "Description", "Price", "Category", "Available", "Image"],
                    ["1", "Ramen", "Pork broth", "12", "Mains", "TRUE"],
                    ["2", "Tea", "", 3, "Drinks", false]
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let rows = client_for(&server)
        .read_table(&sheet_config(), "Menu")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1][1], "Ramen");
    assert_eq!(rows[2][3], "3");
    assert_eq!(rows[2][5], "FALSE");
}

#[tokio::test]
async fn test_read_empty_sheet_has_no_rows() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/v4/spreadsheets/sheet-1/values/Orders")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"range": "Orders!A1:Z1000", "majorDimension": "ROWS"}"#)
        .create_async()
        .await;

    let rows = client_for(&server)
        .read_table(&sheet_config(), "Orders")
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_read_forwards_upstream_message() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/v4/spreadsheets/sheet-1/values/Menu")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body(
            json!({
                "error": {
                    "code": 403,
                    "message": "The caller does not have permission",
                    "status": "PERMISSION_DENIED"
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let err = client_for(&server)
        .read_table(&sheet_config(), "Menu")
        .await
        .unwrap_err();

    match err {
        ReadError::Upstream(message) => assert_eq!(message, "The caller does not have permission"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_read_falls_back_when_body_has_no_message() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/v4/spreadsheets/sheet-1/values/Menu")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("gateway exploded")
        .create_async()
        .await;

    let err = client_for(&server)
        .read_table(&sheet_config(), "Menu")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch sheet");
}

#[tokio::test]
async fn test_write_row_sends_bearer_raw_single_row() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/v4/spreadsheets/sheet-1/values/Menu!A3:G3")
        .match_query(Matcher::UrlEncoded("valueInputOption".into(), "RAW".into()))
        .match_header("authorization", "Bearer write-token")
        .match_body(Matcher::Json(json!({
            "values": [["2", "Gyoza", "Dumplings", "9.00", "Appetizers", "TRUE", ""]]
        })))
        .with_status(200)
        .with_body(r#"{"updatedRange": "Menu!A3:G3", "updatedRows": 1}"#)
        .create_async()
        .await;

    let service = SheetsService::new(Arc::new(client_for(&server)));
    let original = MenuItem {
        id: "2".into(),
        name: "Gyoza".into(),
        description: "Dumplings".into(),
        price: "8.00".into(),
        category: "Appetizers".into(),
        image_url: None,
        available: true,
    };
    let delta = MenuItemUpdate {
        price: Some("9.00".into()),
        ..Default::default()
    };

    service
        .update_menu_item(&sheet_config(), 1, &original, &delta)
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_write_forwards_upstream_message() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("PUT", "/v4/spreadsheets/sheet-1/values/Menu!A2:G2")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"error": {"code": 401, "message": "Request had invalid authentication credentials."}}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .write_row(&sheet_config(), "Menu!A2:G2", &["1".to_string()])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WriteError::Upstream(ref message) if message == "Request had invalid authentication credentials."
    ));
}

#[tokio::test]
async fn test_service_maps_orders_newest_first() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/v4/spreadsheets/sheet-1/values/Orders")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "values": [
                    ["ID", "Items", "Total", "Status", "Table", "Timestamp"],
                    ["100", "1x Mochi", "5.50", "Delivered", "2", "10:00"],
                    ["101", "2x Ramen", "29.00", "Preparing", "4", "10:05"]
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let service = SheetsService::new(Arc::new(client_for(&server)));
    let orders = service.get_orders(&sheet_config()).await.unwrap();

    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].id, "101");
    assert_eq!(orders[0].status, OrderStatus::Preparing);
    assert_eq!(orders[1].table_number, "2");
}
