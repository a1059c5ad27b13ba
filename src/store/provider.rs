//! Provider record schema.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A named external LLM service configuration.
///
/// Records are owned by the store; resolution treats them as read-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderRecord {
    /// Unique provider name, e.g. `"openai"` or `"anthropic"`.
    pub name: String,
    /// Model used when no override applies.
    pub default_model_name: String,
    /// Cheaper/faster alternate model, preferred when low latency matters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fast_default_model_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Endpoint override. Required for providers without a well-known base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    /// Provider-specific settings passed through as request headers.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub custom_config: HashMap<String, String>,
    /// Whether this record is the store-wide default provider.
    #[serde(default)]
    pub is_default: bool,
}
