//! Assistant backend against a local mock server

use std::sync::Arc;

use menu_client::{ClientConfig, FALLBACK_REPLY, GREETING, MenuAssistant, MenuItem};
use mockito::{Matcher, Server};
use serde_json::json;

fn menu() -> Vec<MenuItem> {
    vec![MenuItem {
        id: "1".into(),
        name: "Spicy Ramen".into(),
        description: "Rich pork broth with chili oil".into(),
        price: "14.50".into(),
        category: "Mains".into(),
        image_url: None,
        available: true,
    }]
}

fn assistant_for(server: &Server) -> MenuAssistant {
    let backend = ClientConfig::new()
        .with_gemini_base_url(server.url())
        .with_gemini_model("test-model")
        .with_gemini_api_key("gen-key")
        .with_timeout(5)
        .build_gemini_backend()
        .unwrap();
    MenuAssistant::new(Arc::new(backend))
}

#[tokio::test]
async fn test_ask_sends_user_turns_and_returns_text() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1beta/models/test-model:generateContent")
        .match_query(Matcher::UrlEncoded("key".into(), "gen-key".into()))
        .match_body(Matcher::PartialJson(json!({
            "contents": [
                { "role": "user", "parts": [{ "text": GREETING }] },
                { "role": "user", "parts": [{ "text": "Is the ramen spicy?" }] }
            ],
            "generationConfig": { "temperature": 0.7 }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": "Yes, " }, { "text": "it has chili oil." }] },
                    "finishReason": "STOP"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let reply = assistant_for(&server)
        .ask(&menu(), "Is the ramen spicy?", &[GREETING.to_string()])
        .await;

    mock.assert_async().await;
    assert_eq!(reply, "Yes, it has chili oil.");
}

#[tokio::test]
async fn test_ask_sends_menu_as_system_instruction() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1beta/models/test-model:generateContent")
        .match_query(Matcher::Any)
        .match_body(Matcher::Regex(
            "Spicy Ramen \\(Mains\\): \\$14.50 - Rich pork broth with chili oil \\[In Stock\\]".into(),
        ))
        .with_status(200)
        .with_body(r#"{"candidates": [{"content": {"parts": [{"text": "Sure."}]}}]}"#)
        .create_async()
        .await;

    let reply = assistant_for(&server).ask(&menu(), "What's good?", &[]).await;
    mock.assert_async().await;
    assert_eq!(reply, "Sure.");
}

#[tokio::test]
async fn test_upstream_failure_yields_fallback() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1beta/models/test-model:generateContent")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body(r#"{"error": {"message": "internal"}}"#)
        .create_async()
        .await;

    let reply = assistant_for(&server).ask(&menu(), "Anything vegan?", &[]).await;
    assert_eq!(reply, FALLBACK_REPLY);
}

#[tokio::test]
async fn test_malformed_body_yields_fallback() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1beta/models/test-model:generateContent")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let reply = assistant_for(&server).ask(&menu(), "Hello", &[]).await;
    assert_eq!(reply, FALLBACK_REPLY);
}
