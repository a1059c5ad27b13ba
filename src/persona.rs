//! Persona input entity.
//!
//! Personas are reusable assistant configuration bundles owned by the layers
//! above this crate (storage, API). Resolution only reads the two LLM
//! override fields; everything else about a persona is opaque here.

use serde::{Deserialize, Serialize};

/// A persona as seen by provider resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Provider this persona pins its conversations to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_model_provider_override: Option<String>,
    /// Model version this persona pins its conversations to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_model_version_override: Option<String>,
}

impl Persona {
    /// A persona with no LLM overrides.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            llm_model_provider_override: None,
            llm_model_version_override: None,
        }
    }
}
