//! Caller-supplied LLM overrides and precedence resolution.

use serde::{Deserialize, Serialize};

/// Per-call overrides for provider resolution.
///
/// Each field is independent; a set field wins over the corresponding
/// persona-level setting for a single resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LLMOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// First value in precedence order that is present and non-empty.
///
/// Empty strings count as unset, so an override cleared to `""` falls
/// through to the next level.
pub fn first_set<'a>(values: &[Option<&'a str>]) -> Option<&'a str> {
    values.iter().filter_map(|v| *v).find(|v| !v.is_empty())
}

/// `Some(value)` unless the string is empty.
pub(crate) fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() { None } else { Some(value) }
}
