//! Embedding configuration.

use faqbot_core::config::{EmbeddingSettings, DEFAULT_OLLAMA_ENDPOINT};
use serde::{Deserialize, Serialize};

/// Embedding configuration resolved from application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingConfig {
    /// Provider name: "trigram" or "ollama"
    pub provider: String,

    /// Model identifier (provider-specific)
    pub model: String,

    /// Embedding vector dimensions
    pub dimensions: usize,

    /// Base URL for HTTP providers
    pub endpoint: String,

    /// Retry attempts for HTTP providers
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_max_retries() -> u32 {
    3
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "trigram".to_string(),
            model: "trigram-v1".to_string(),
            dimensions: 384,
            endpoint: DEFAULT_OLLAMA_ENDPOINT.to_string(),
            max_retries: default_max_retries(),
        }
    }
}

impl EmbeddingConfig {
    /// Build from the `embedding` section of the application config.
    pub fn from_settings(settings: &EmbeddingSettings) -> Self {
        Self {
            provider: settings.provider.clone(),
            model: settings.model.clone(),
            dimensions: settings.dimensions,
            endpoint: settings
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_OLLAMA_ENDPOINT.to_string()),
            max_retries: default_max_retries(),
        }
    }
}
