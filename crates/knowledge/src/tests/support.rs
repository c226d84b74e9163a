//! Deterministic stand-ins for the engine's collaborators.

use crate::embeddings::EmbeddingProvider;
use crate::extract::AnswerExtractor;
use faqbot_core::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Embedder with hand-picked vectors.
///
/// Texts without a registered vector embed to the zero vector, which scores
/// 0.0 against everything.
#[derive(Debug, Default)]
pub(crate) struct FixedEmbedder {
    dimensions: usize,
    vectors: HashMap<String, Vec<f32>>,
    failing: Vec<String>,
    calls: AtomicUsize,
}

impl FixedEmbedder {
    pub(crate) fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            ..Default::default()
        }
    }

    pub(crate) fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        assert_eq!(vector.len(), self.dimensions, "vector for {:?} has wrong size", text);
        self.vectors.insert(text.to_string(), vector);
        self
    }

    /// Make embedding `text` fail.
    pub(crate) fn failing_on(mut self, text: &str) -> Self {
        self.failing.push(text.to_string());
        self
    }

    /// Number of `embed_batch` calls so far.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for FixedEmbedder {
    fn provider_name(&self) -> &str {
        "fixed"
    }

    fn model_name(&self) -> &str {
        "fixed"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        texts
            .iter()
            .map(|text| {
                if self.failing.contains(text) {
                    return Err(AppError::Embedding(format!("refusing to embed {:?}", text)));
                }
                Ok(self
                    .vectors
                    .get(text)
                    .cloned()
                    .unwrap_or_else(|| vec![0.0; self.dimensions]))
            })
            .collect()
    }
}

/// Extractor that answers with the whole context, tagged, and records the
/// questions it was asked.
#[derive(Debug, Default)]
pub(crate) struct EchoExtractor {
    questions: Mutex<Vec<String>>,
}

impl EchoExtractor {
    pub(crate) fn calls(&self) -> usize {
        self.questions().len()
    }

    pub(crate) fn questions(&self) -> Vec<String> {
        self.questions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait::async_trait]
impl AnswerExtractor for EchoExtractor {
    fn name(&self) -> &str {
        "echo"
    }

    async fn extract(&self, question: &str, context: &str) -> AppResult<String> {
        self.questions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(question.to_string());
        Ok(format!("from: {}", context))
    }
}

/// Extractor that always fails.
#[derive(Debug, Default)]
pub(crate) struct FailingExtractor;

#[async_trait::async_trait]
impl AnswerExtractor for FailingExtractor {
    fn name(&self) -> &str {
        "failing"
    }

    async fn extract(&self, _question: &str, _context: &str) -> AppResult<String> {
        Err(AppError::Extraction("model exploded".to_string()))
    }
}
