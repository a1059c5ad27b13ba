//! LLM error types.

use thiserror::Error;

use crate::store::StoreError;

/// Check an HTTP response for rate-limit errors, returning `RateLimit` for 429.
pub fn check_response_error(response: &reqwest::Response) -> Option<LLMError> {
    if response.status().is_success() {
        return None;
    }
    if response.status().as_u16() == 429 {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        return Some(LLMError::RateLimit { retry_after });
    }
    None
}

/// Errors from provider resolution and LLM API calls.
#[derive(Debug, Error)]
pub enum LLMError {
    /// Generative AI is switched off process-wide. Raised before any store
    /// access, never retried.
    #[error("generative ai features are disabled")]
    GenAiDisabled,

    /// Neither the requested nor the default provider exists in the store.
    #[error("llm provider {} not found", name.as_deref().unwrap_or("(default)"))]
    ProviderNotFound { name: Option<String> },

    /// The resolved provider has no usable model name.
    #[error("provider '{provider}' has no model name configured")]
    ModelNameMissing { provider: String },

    /// No endpoint can be inferred for the provider and none was configured.
    #[error("provider '{provider}' requires an explicit api base url")]
    MissingApiBase { provider: String },

    /// HTTP request failed
    #[error("http request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API returned an error response
    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Rate limited (429)
    #[error("rate limited (retry after {retry_after:?}s)")]
    RateLimit { retry_after: Option<u64> },

    /// Provider store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}
