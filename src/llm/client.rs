//! Constructed LLM client handle.
//!
//! An `LLMClient` is bound to one provider, one model, and one set of
//! connection parameters at construction time. It owns no shared state; the
//! caller owns the handle outright.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::warn;

use super::error::LLMError;
use super::provider::{AnthropicProvider, LLMProvider, OpenAICompatibleProvider};
use super::types::{ChatRequest, ChatResponse, Message};
use crate::store::ProviderRecord;

/// Chat completion client bound to a single provider and model.
pub struct LLMClient {
    provider: String,
    model: String,
    temperature: f32,
    backend: Box<dyn LLMProvider>,
}

impl std::fmt::Debug for LLMClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMClient")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

impl LLMClient {
    /// Construct a client from a provider record's connection parameters.
    ///
    /// Values pass through unvalidated. `extra_headers` (process-wide) and
    /// the record's `custom_config` become default headers on every request;
    /// entries that are not valid HTTP headers are skipped.
    pub fn new(
        model: &str,
        record: &ProviderRecord,
        temperature: f32,
        timeout: Duration,
        extra_headers: &HashMap<String, String>,
    ) -> Result<Self, LLMError> {
        let http = build_http_client(timeout, extra_headers, &record.custom_config)?;
        let backend = build_backend(http, record)?;

        Ok(Self {
            provider: record.name.clone(),
            model: model.to_string(),
            temperature,
            backend,
        })
    }

    /// Name of the provider this client is bound to.
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Model name requests are issued against.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sampling temperature applied when the request leaves it unset.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Submit a conversation and receive a completion, bound to this
    /// client's model and temperature.
    pub async fn complete(
        &self,
        messages: Vec<Message>,
        max_tokens: Option<u32>,
    ) -> Result<ChatResponse, LLMError> {
        self.backend
            .chat(ChatRequest {
                model: self.model.clone(),
                messages,
                temperature: Some(self.temperature),
                max_tokens,
            })
            .await
    }
}

#[async_trait]
impl LLMProvider for LLMClient {
    async fn chat(&self, mut request: ChatRequest) -> Result<ChatResponse, LLMError> {
        if request.model.is_empty() {
            request.model = self.model.clone();
        }
        if request.temperature.is_none() {
            request.temperature = Some(self.temperature);
        }
        self.backend.chat(request).await
    }
}

/// Well-known base URLs for providers speaking the OpenAI wire format.
fn default_api_base(provider: &str) -> Option<&'static str> {
    match provider {
        "openai" => Some("https://api.openai.com/v1"),
        "openrouter" => Some("https://openrouter.ai/api/v1"),
        "ollama" => Some("http://localhost:11434/v1"),
        _ => None,
    }
}

fn build_backend(http: Client, record: &ProviderRecord) -> Result<Box<dyn LLMProvider>, LLMError> {
    let provider = record.name.to_ascii_lowercase();

    if provider == "anthropic" {
        let base_url = record
            .api_base
            .clone()
            .unwrap_or_else(|| AnthropicProvider::DEFAULT_BASE_URL.to_string());
        return Ok(Box::new(AnthropicProvider::new(
            http,
            base_url,
            record.api_key.clone().unwrap_or_default(),
            record.api_version.clone(),
        )));
    }

    let base_url = match record.api_base.as_deref() {
        Some(base) => base.to_string(),
        None => default_api_base(&provider)
            .map(str::to_string)
            .ok_or_else(|| LLMError::MissingApiBase {
                provider: record.name.clone(),
            })?,
    };
    Ok(Box::new(OpenAICompatibleProvider::new(
        http,
        base_url,
        record.api_key.clone(),
    )))
}

fn build_http_client(
    timeout: Duration,
    extra_headers: &HashMap<String, String>,
    custom_config: &HashMap<String, String>,
) -> Result<Client, LLMError> {
    let mut headers = HeaderMap::new();
    for (key, value) in extra_headers.iter().chain(custom_config.iter()) {
        match (
            HeaderName::try_from(key.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!(header = %key, "skipping invalid extra header"),
        }
    }

    Ok(Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .build()?)
}
