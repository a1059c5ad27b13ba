//! Provider resolution and client construction.
//!
//! Resolution runs per call and holds no state between calls: decide the
//! effective provider (per-call override, then persona override, then the
//! stored default), decide the effective model name, then hand the record's
//! connection parameters to the client constructor.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::client::LLMClient;
use super::error::LLMError;
use super::overrides::{LLMOverride, first_set, non_empty};
use crate::config::GenAiConfig;
use crate::persona::Persona;
use crate::store::{ProviderRecord, ProviderStore};

/// Per-call knobs for [`LLMFactory::default_client`].
///
/// Unset fields fall back to the stored default provider and the configured
/// defaults.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Explicit provider name; skips the stored default.
    pub provider: Option<String>,
    /// Explicit model name; skips the record's model names entirely.
    pub model_version: Option<String>,
    pub temperature: Option<f32>,
    pub timeout: Option<Duration>,
    /// Prefer the provider's fast model when it has one.
    pub use_fast_model: bool,
}

/// Builds LLM clients from the provider store and process-wide defaults.
///
/// Holds the injected configuration and the store seam; each resolution is
/// independent, so a single factory is safely shared across callers.
pub struct LLMFactory {
    config: GenAiConfig,
    store: Arc<dyn ProviderStore>,
}

impl LLMFactory {
    pub fn new(config: GenAiConfig, store: Arc<dyn ProviderStore>) -> Self {
        Self { config, store }
    }

    /// Build a client for a persona, honoring per-call overrides.
    ///
    /// Precedence per field: the override (if set) beats the persona's own
    /// override, which beats the stored default provider. Temperature falls
    /// back to the configured default.
    pub async fn client_for_persona(
        &self,
        persona: &Persona,
        overrides: Option<&LLMOverride>,
    ) -> Result<LLMClient, LLMError> {
        let provider = first_set(&[
            overrides.and_then(|o| o.model_provider.as_deref()),
            persona.llm_model_provider_override.as_deref(),
        ]);
        let model_version = first_set(&[
            overrides.and_then(|o| o.model_version.as_deref()),
            persona.llm_model_version_override.as_deref(),
        ]);

        self.default_client(ClientOptions {
            provider: provider.map(str::to_string),
            model_version: model_version.map(str::to_string),
            temperature: overrides.and_then(|o| o.temperature),
            ..Default::default()
        })
        .await
    }

    /// Resolve a provider record and build a client from it.
    pub async fn default_client(&self, opts: ClientOptions) -> Result<LLMClient, LLMError> {
        if self.config.disabled {
            return Err(LLMError::GenAiDisabled);
        }

        let requested = opts.provider.as_deref().and_then(non_empty);

        // The catalog is the scoped read view; it is dropped as soon as the
        // record is cloned out, on the error paths included.
        let record = {
            let catalog = self.store.load().await?;
            match requested {
                None => catalog.fetch_default_provider(),
                Some(name) => catalog.fetch_provider(name),
            }
            .cloned()
        };

        let Some(record) = record else {
            return Err(LLMError::ProviderNotFound {
                name: requested.map(str::to_string),
            });
        };

        let model = resolve_model_name(&record, opts.model_version.as_deref(), opts.use_fast_model)
            .ok_or_else(|| LLMError::ModelNameMissing {
                provider: record.name.clone(),
            })?
            .to_string();

        let temperature = opts.temperature.unwrap_or(self.config.temperature);
        let timeout = opts
            .timeout
            .unwrap_or(Duration::from_secs(self.config.request_timeout_seconds));

        debug!(provider = %record.name, model = %model, "resolved llm provider");

        self.build_client(&model, &record, temperature, timeout)
    }

    /// Construct a client directly from a resolved record. No store access.
    pub fn build_client(
        &self,
        model: &str,
        record: &ProviderRecord,
        temperature: f32,
        timeout: Duration,
    ) -> Result<LLMClient, LLMError> {
        LLMClient::new(
            model,
            record,
            temperature,
            timeout,
            &self.config.extra_headers,
        )
    }
}

/// Effective model name: explicit override, else the fast model when asked
/// for and present, else the record's default. Empty names count as missing.
fn resolve_model_name<'a>(
    record: &'a ProviderRecord,
    model_version: Option<&'a str>,
    use_fast_model: bool,
) -> Option<&'a str> {
    if let Some(version) = model_version.and_then(non_empty) {
        return Some(version);
    }
    if use_fast_model
        && let Some(fast) = record.fast_default_model_name.as_deref().and_then(non_empty)
    {
        return Some(fast);
    }
    non_empty(&record.default_model_name)
}
