//! In-memory embedding index over document sections.
//!
//! The index is built once when the engine starts and never mutated after, so
//! it can be shared across concurrent queries without locking.

use crate::embeddings::EmbeddingProvider;
use crate::types::Section;
use faqbot_core::{AppError, AppResult};
use std::sync::Arc;

/// Sections paired 1:1 with their embeddings.
#[derive(Debug, Clone)]
pub struct EmbeddingIndex {
    sections: Vec<Section>,
    embeddings: Vec<Vec<f32>>,
    provider: Arc<dyn EmbeddingProvider>,
}

impl EmbeddingIndex {
    /// Embed every section with `provider`.
    ///
    /// An empty section list produces an empty index without calling the provider.
    pub async fn build(
        sections: Vec<Section>,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> AppResult<Self> {
        if sections.is_empty() {
            tracing::debug!("No sections to embed, index is empty");
            return Ok(Self {
                sections,
                embeddings: Vec::new(),
                provider,
            });
        }

        let texts: Vec<String> = sections.iter().map(|s| s.text.clone()).collect();
        let embeddings = provider.embed_batch(&texts).await?;

        if embeddings.len() != sections.len() {
            return Err(AppError::Embedding(format!(
                "Provider '{}' returned {} embeddings for {} sections",
                provider.provider_name(),
                embeddings.len(),
                sections.len()
            )));
        }

        tracing::debug!(
            "Embedded {} sections with provider '{}' (model: {}, dimensions: {})",
            sections.len(),
            provider.provider_name(),
            provider.model_name(),
            provider.dimensions()
        );

        Ok(Self {
            sections,
            embeddings,
            provider,
        })
    }

    /// Embed a query with the same provider used for the sections.
    pub async fn embed_query(&self, query: &str) -> AppResult<Vec<f32>> {
        self.provider.embed(query).await
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn embeddings(&self) -> &[Vec<f32>] {
        &self.embeddings
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn provider(&self) -> &dyn EmbeddingProvider {
        self.provider.as_ref()
    }
}
