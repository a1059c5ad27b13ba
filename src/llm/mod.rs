//! LLM provider resolution and chat completion clients.

mod client;
mod error;
mod factory;
mod overrides;
mod provider;
mod types;

pub use client::LLMClient;
pub use error::LLMError;
pub use factory::{ClientOptions, LLMFactory};
pub use overrides::{LLMOverride, first_set};
pub use provider::{AnthropicProvider, LLMProvider, OpenAICompatibleProvider};
pub use types::{ChatRequest, ChatResponse, Choice, Message, Role, Usage};
