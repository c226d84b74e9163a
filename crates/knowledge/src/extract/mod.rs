//! Answer extraction from a matched section.
//!
//! An extractor turns `(question, context)` into a short answer grounded in the
//! context. Extraction is allowed to fail; the engine replaces any failure with
//! a fixed apology instead of surfacing the error.

pub mod keyword;
pub mod ollama;

pub use keyword::KeywordExtractor;
pub use ollama::OllamaExtractor;

use faqbot_core::config::ExtractorSettings;
use faqbot_core::{AppError, AppResult};
use std::sync::Arc;

/// Trait for answer extractors.
#[async_trait::async_trait]
pub trait AnswerExtractor: Send + Sync + std::fmt::Debug {
    /// Extractor name (e.g., "keyword", "ollama")
    fn name(&self) -> &str;

    /// Extract an answer to `question` from `context`.
    async fn extract(&self, question: &str, context: &str) -> AppResult<String>;
}

/// Create an answer extractor from settings.
pub fn create_extractor(
    settings: &ExtractorSettings,
    endpoint: &str,
) -> AppResult<Arc<dyn AnswerExtractor>> {
    match settings.kind.as_str() {
        "keyword" => Ok(Arc::new(KeywordExtractor::new())),
        "ollama" => {
            let extractor = OllamaExtractor::new(endpoint, &settings.model, settings.timeout_secs)?;
            Ok(Arc::new(extractor))
        }
        _ => Err(AppError::Config(format!(
            "Unknown extractor: '{}'. Supported extractors: keyword, ollama",
            settings.kind
        ))),
    }
}
