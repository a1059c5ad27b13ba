//! LLM capability trait and completion adapters.
//!
//! Two wire formats cover the configured providers: OpenAI-compatible chat
//! completions (OpenAI, OpenRouter, Ollama, anything speaking the same JSON)
//! and the Anthropic messages API. Adapters take a prebuilt `reqwest::Client`
//! so the constructor controls timeout and default headers.

use async_trait::async_trait;
use reqwest::Client;

use super::error::{LLMError, check_response_error};
use super::types::{ChatRequest, ChatResponse, Choice, Message, Role, Usage};

/// Generic LLM capability: submit a prompt, receive a completion.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Make a chat completion request.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LLMError>;
}

// ============================================================================
// OpenAI-compatible
// ============================================================================

/// OpenAI-compatible provider (works for OpenAI, OpenRouter, Ollama).
pub struct OpenAICompatibleProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAICompatibleProvider {
    pub fn new(client: Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl LLMProvider for OpenAICompatibleProvider {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LLMError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut req = self
            .client
            .post(&url)
            .header("Content-Type", "application/json");

        if let Some(ref key) = self.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }

        let response = req.json(&request).send().await?;

        if let Some(err) = check_response_error(&response) {
            return Err(err);
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(LLMError::Api { status, message });
        }

        Ok(response.json().await?)
    }
}

// ============================================================================
// Anthropic
// ============================================================================

/// Anthropic provider with native API format.
pub struct AnthropicProvider {
    client: Client,
    base_url: String,
    api_key: String,
    api_version: String,
}

impl AnthropicProvider {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.anthropic.com";
    pub const DEFAULT_API_VERSION: &'static str = "2023-06-01";

    pub fn new(
        client: Client,
        base_url: String,
        api_key: String,
        api_version: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url,
            api_key,
            api_version: api_version.unwrap_or_else(|| Self::DEFAULT_API_VERSION.to_string()),
        }
    }
}

#[async_trait]
impl LLMProvider for AnthropicProvider {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LLMError> {
        let url = format!("{}/v1/messages", self.base_url);
        let anthropic_request = to_request(&request);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&anthropic_request)
            .send()
            .await?;

        if let Some(err) = check_response_error(&response) {
            return Err(err);
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(LLMError::Api { status, message });
        }

        let anthropic_response: Response = response.json().await?;
        Ok(from_response(anthropic_response))
    }
}

// ============================================================================
// Anthropic Request/Response Types
// ============================================================================

#[derive(serde::Serialize)]
struct Request {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<RequestMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(serde::Serialize)]
struct RequestMessage {
    role: String,
    content: String,
}

#[derive(serde::Deserialize)]
struct Response {
    id: String,
    content: Vec<ResponseContent>,
    stop_reason: Option<String>,
    usage: Option<ResponseUsage>,
}

#[derive(serde::Deserialize)]
struct ResponseContent {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

#[derive(serde::Deserialize)]
struct ResponseUsage {
    input_tokens: u32,
    output_tokens: u32,
}

// ============================================================================
// Conversions
// ============================================================================

fn to_request(request: &ChatRequest) -> Request {
    let mut system_parts: Vec<String> = Vec::new();
    let mut messages = Vec::new();

    for msg in &request.messages {
        match msg.role {
            // Anthropic wants system prompts as a separate field
            Role::System => {
                if !msg.content.is_empty() {
                    system_parts.push(msg.content.clone());
                }
            }
            Role::User => messages.push(RequestMessage {
                role: "user".to_string(),
                content: msg.content.clone(),
            }),
            Role::Assistant => messages.push(RequestMessage {
                role: "assistant".to_string(),
                content: msg.content.clone(),
            }),
        }
    }

    let system = if system_parts.is_empty() {
        None
    } else {
        Some(system_parts.join("\n\n"))
    };

    Request {
        model: request.model.clone(),
        max_tokens: request.max_tokens.unwrap_or(4096),
        system,
        messages,
        temperature: request.temperature,
    }
}

fn from_response(response: Response) -> ChatResponse {
    let content = response
        .content
        .into_iter()
        .filter(|c| c.content_type == "text")
        .map(|c| c.text)
        .collect::<Vec<_>>()
        .join("");

    ChatResponse {
        id: response.id,
        choices: vec![Choice {
            index: 0,
            message: Message::new(Role::Assistant, content),
            finish_reason: response.stop_reason,
        }],
        usage: response.usage.map(|u| Usage {
            prompt_tokens: u.input_tokens,
            completion_tokens: u.output_tokens,
            total_tokens: u.input_tokens + u.output_tokens,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_messages_lift_into_system_field() {
        let request = ChatRequest {
            model: "claude-3-5-sonnet".to_string(),
            messages: vec![
                Message::new(Role::System, "Be terse."),
                Message::new(Role::User, "Hello"),
            ],
            temperature: Some(0.5),
            max_tokens: None,
        };

        let converted = to_request(&request);
        assert_eq!(converted.system.as_deref(), Some("Be terse."));
        assert_eq!(converted.messages.len(), 1);
        assert_eq!(converted.messages[0].role, "user");
        assert_eq!(converted.max_tokens, 4096);
    }

    #[test]
    fn multiple_system_messages_join() {
        let request = ChatRequest {
            model: "claude-3-5-sonnet".to_string(),
            messages: vec![
                Message::new(Role::System, "Be terse."),
                Message::new(Role::System, "Answer in English."),
                Message::new(Role::User, "Hello"),
            ],
            temperature: None,
            max_tokens: Some(256),
        };

        let converted = to_request(&request);
        assert_eq!(
            converted.system.as_deref(),
            Some("Be terse.\n\nAnswer in English.")
        );
        assert_eq!(converted.max_tokens, 256);
    }

    #[test]
    fn response_translates_to_common_format() {
        let json = r#"{
            "id": "msg_01",
            "content": [
                {"type": "text", "text": "Hi "},
                {"type": "text", "text": "there"}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 12, "output_tokens": 3}
        }"#;

        let response: Response = serde_json::from_str(json).unwrap();
        let converted = from_response(response);
        assert_eq!(converted.content(), Some("Hi there"));
        assert_eq!(
            converted.choices[0].finish_reason.as_deref(),
            Some("end_turn")
        );
        assert_eq!(converted.usage.unwrap().total_tokens, 15);
    }
}
