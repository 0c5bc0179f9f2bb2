//! Menu assistant
//!
//! Answers diner questions using the current menu as context. The public
//! entry point, [`MenuAssistant::ask`], never fails: every error is logged
//! and replaced by a fixed apology so the chat never shows a raw error.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{AssistantError, ClientConfig, ClientResult};
use shared::MenuItem;

/// Reply used when generation fails for any reason
pub const FALLBACK_REPLY: &str =
    "I'm having trouble connecting to my brain right now. Please ask again later.";
/// Reply used when generation succeeds with no text
pub const EMPTY_REPLY: &str = "I apologize, I couldn't think of a response right now.";
/// First transcript entry of a chat session
pub const GREETING: &str = "Hello! I'm your AI Menu Assistant. Ask me anything about our food!";

/// Sampling temperature for assistant replies
pub const ASSISTANT_TEMPERATURE: f32 = 0.7;

/// Speaker of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One role-tagged message turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }
}

/// Generation request
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system_instruction: String,
    pub turns: Vec<ChatTurn>,
    pub temperature: f32,
}

/// Text generation transport
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn generate(&self, request: ChatRequest) -> Result<String, AssistantError>;
}

// ========== Gemini wire format ==========

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<ChatRole>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

fn text_content(role: Option<ChatRole>, text: String) -> GeminiContent {
    GeminiContent {
        role,
        parts: vec![GeminiPart { text: Some(text) }],
    }
}

/// `generateContent` backend
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiBackend {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            client: config.build_http()?,
            base_url: config.gemini_base_url.clone(),
            model: config.gemini_model.clone(),
            api_key: config
                .gemini_api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl ChatBackend for GeminiBackend {
    async fn generate(&self, request: ChatRequest) -> Result<String, AssistantError> {
        let api_key = self.api_key.as_deref().ok_or(AssistantError::MissingApiKey)?;

        let body = GenerateContentRequest {
            system_instruction: text_content(None, request.system_instruction),
            contents: request
                .turns
                .into_iter()
                .map(|turn| text_content(Some(turn.role), turn.text))
                .collect(),
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AssistantError::Upstream(format!("{}: {}", status, text)));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::InvalidResponse(e.to_string()))?;

        Ok(parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default())
    }
}

// ========== Prompt ==========

/// One line per item: `name (category): $price - description [stock]`
pub fn menu_context(menu: &[MenuItem]) -> String {
    menu.iter()
        .map(|item| {
            format!(
                "{} ({}): ${} - {} [{}]",
                item.name,
                item.category,
                item.price,
                item.description,
                item.stock_label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Persona, menu block and answering rules
pub fn system_instruction(menu: &[MenuItem]) -> String {
    format!(
        "You are a knowledgeable and charming restaurant server.\n\
         Use the following current menu data to answer user questions:\n\
         \n\
         --- MENU START ---\n\
         {}\n\
         --- MENU END ---\n\
         \n\
         Rules:\n\
         1. Only recommend items currently on the menu.\n\
         2. If an item is out of stock (available: false), mention it politely.\n\
         3. Keep answers concise (under 100 words) unless asked for a detailed explanation.\n\
         4. Be helpful with dietary restrictions if you can infer them from descriptions.\n",
        menu_context(menu)
    )
}

/// Menu question answering over a [`ChatBackend`]
#[derive(Clone)]
pub struct MenuAssistant {
    backend: Arc<dyn ChatBackend>,
}

impl MenuAssistant {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// Build the request: every history entry and the question go in as user turns
    pub fn build_request(menu: &[MenuItem], question: &str, history: &[String]) -> ChatRequest {
        let mut turns: Vec<ChatTurn> = history.iter().map(ChatTurn::user).collect();
        turns.push(ChatTurn::user(question));

        ChatRequest {
            system_instruction: system_instruction(menu),
            turns,
            temperature: ASSISTANT_TEMPERATURE,
        }
    }

    /// Answer `question`. Never fails.
    pub async fn ask(&self, menu: &[MenuItem], question: &str, history: &[String]) -> String {
        let request = Self::build_request(menu, question, history);

        match self.backend.generate(request).await {
            Ok(text) if text.trim().is_empty() => EMPTY_REPLY.to_string(),
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "Menu assistant failed");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

/// Speaker of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

/// Transcript entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub text: String,
}

/// Chat transcript with a single in-flight question at a time
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    awaiting_reply: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage {
                speaker: Speaker::Assistant,
                text: GREETING.to_string(),
            }],
            awaiting_reply: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// Record a question and return `(question, history)` for [`MenuAssistant::ask`].
    ///
    /// Returns `None` for blank input or while a reply is pending. History is
    /// the text of every entry before the question, regardless of speaker.
    pub fn begin(&mut self, input: &str) -> Option<(String, Vec<String>)> {
        if input.trim().is_empty() || self.awaiting_reply {
            return None;
        }

        let history = self.messages.iter().map(|m| m.text.clone()).collect();
        self.messages.push(ChatMessage {
            speaker: Speaker::User,
            text: input.to_string(),
        });
        self.awaiting_reply = true;
        Some((input.to_string(), history))
    }

    /// Record the assistant reply to the pending question
    pub fn finish(&mut self, reply: String) {
        self.messages.push(ChatMessage {
            speaker: Speaker::Assistant,
            text: reply,
        });
        self.awaiting_reply = false;
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FailingBackend;

    #[async_trait]
    impl ChatBackend for FailingBackend {
        async fn generate(&self, _request: ChatRequest) -> Result<String, AssistantError> {
            Err(AssistantError::Upstream("503 Service Unavailable".into()))
        }
    }

    #[derive(Default)]
    struct RecordingBackend {
        reply: String,
        seen: Mutex<Vec<ChatRequest>>,
    }

    #[async_trait]
    impl ChatBackend for RecordingBackend {
        async fn generate(&self, request: ChatRequest) -> Result<String, AssistantError> {
            self.seen.lock().unwrap().push(request);
            Ok(self.reply.clone())
        }
    }

    fn menu() -> Vec<MenuItem> {
        vec![
            MenuItem {
                id: "1".into(),
                name: "Spicy Ramen".into(),
                description: "Rich pork broth".into(),
                price: "14.50".into(),
                category: "Mains".into(),
                image_url: None,
                available: true,
            },
            MenuItem {
                id: "2".into(),
                name: "Gyoza".into(),
                description: "Dumplings".into(),
                price: "8.00".into(),
                category: "Appetizers".into(),
                image_url: None,
                available: false,
            },
        ]
    }

    #[test]
    fn test_menu_context_lines() {
        let context = menu_context(&menu());
        assert_eq!(
            context,
            "Spicy Ramen (Mains): $14.50 - Rich pork broth [In Stock]\n\
             Gyoza (Appetizers): $8.00 - Dumplings [Out of Stock]"
        );
    }

    #[test]
    fn test_system_instruction_contains_menu_and_rules() {
        let instruction = system_instruction(&menu());
        assert!(instruction.contains("--- MENU START ---\nSpicy Ramen"));
        assert!(instruction.contains("--- MENU END ---"));
        assert!(instruction.contains("1. Only recommend items currently on the menu."));
        assert!(instruction.contains("4. Be helpful with dietary restrictions"));
    }

    #[test]
    fn test_request_turns_are_all_user() {
        let history = vec![GREETING.to_string(), "Is it spicy?".to_string()];
        let request = MenuAssistant::build_request(&menu(), "Any vegan dishes?", &history);
        assert_eq!(request.turns.len(), 3);
        assert!(request.turns.iter().all(|t| t.role == ChatRole::User));
        assert_eq!(request.turns[2].text, "Any vegan dishes?");
        assert_eq!(request.temperature, ASSISTANT_TEMPERATURE);
    }

    #[tokio::test]
    async fn test_failure_becomes_fallback() {
        let assistant = MenuAssistant::new(Arc::new(FailingBackend));
        for question in ["", "What is good?", "ramen?"] {
            let reply = assistant.ask(&menu(), question, &[]).await;
            assert_eq!(reply, FALLBACK_REPLY);
        }
    }

    #[tokio::test]
    async fn test_blank_reply_becomes_apology() {
        let backend = Arc::new(RecordingBackend {
            reply: "  ".into(),
            ..Default::default()
        });
        let assistant = MenuAssistant::new(backend.clone());
        let reply = assistant.ask(&menu(), "Hi", &[]).await;
        assert_eq!(reply, EMPTY_REPLY);
        assert_eq!(backend.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reply_passes_through() {
        let backend = Arc::new(RecordingBackend {
            reply: "Try the ramen.".into(),
            ..Default::default()
        });
        let assistant = MenuAssistant::new(backend);
        assert_eq!(assistant.ask(&menu(), "Hi", &[]).await, "Try the ramen.");
    }

    #[tokio::test]
    async fn test_missing_key_is_an_error() {
        let backend = GeminiBackend::new(&ClientConfig::new()).unwrap();
        let result = backend
            .generate(MenuAssistant::build_request(&[], "hi", &[]))
            .await;
        assert!(matches!(result, Err(AssistantError::MissingApiKey)));
    }

    #[test]
    fn test_session_history_and_guard() {
        let mut session = ChatSession::new();
        assert!(session.begin("   ").is_none());

        let (question, history) = session.begin("Is the ramen spicy?").unwrap();
        assert_eq!(question, "Is the ramen spicy?");
        assert_eq!(history, vec![GREETING.to_string()]);
        assert!(session.is_awaiting_reply());
        assert!(session.begin("another").is_none());

        session.finish("Yes, it is.".into());
        let (_, history) = session.begin("Thanks").unwrap();
        assert_eq!(
            history,
            vec![
                GREETING.to_string(),
                "Is the ramen spicy?".to_string(),
                "Yes, it is.".to_string()
            ]
        );
        assert_eq!(session.messages().len(), 4);
    }
}
