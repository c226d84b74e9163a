//! Offline embedding provider based on hashed words and character trigrams.

use crate::embeddings::provider::EmbeddingProvider;
use faqbot_core::AppResult;

/// Words too common to tell sections apart.
const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "as", "are", "was", "were", "for", "to", "of",
    "in", "and", "or", "but", "with", "by", "from", "this", "that", "be", "have", "has", "had",
    "it", "its", "their", "they", "them", "you", "your", "can", "how", "what", "do", "does", "i",
    "my", "me", "we", "our",
];

/// Hashing embedder for local, offline operation.
///
/// Each content word contributes to one bucket for the whole word and one
/// bucket per padded character trigram, so inflections like "refund" and
/// "refunds" still share most of their mass. Vectors are unit-normalized, which
/// makes the cosine similarity a plain dot product.
#[derive(Debug)]
pub struct TrigramProvider {
    dimensions: usize,
}

impl TrigramProvider {
    /// Create a new trigram provider with specified dimensions.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];

        // first-seen order, so float sums never depend on hash order
        let mut word_freq: Vec<(String, u32)> = Vec::new();
        for word in content_words(text) {
            match word_freq.iter_mut().find(|(seen, _)| *seen == word) {
                Some((_, freq)) => *freq += 1,
                None => word_freq.push((word, 1)),
            }
        }

        for (word, freq) in &word_freq {
            let weight = *freq as f32;

            embedding[self.bucket(word.as_bytes(), 31)] += weight;

            let padded: Vec<char> = format!(" {} ", word).chars().collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                embedding[self.bucket(trigram.as_bytes(), 37)] += weight.sqrt();
            }
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            embedding.iter_mut().for_each(|v| *v /= norm);
        }

        embedding
    }

    fn bucket(&self, bytes: &[u8], multiplier: u64) -> usize {
        let hash = bytes
            .iter()
            .fold(0u64, |acc, b| acc.wrapping_mul(multiplier).wrapping_add(*b as u64));
        (hash % self.dimensions as u64) as usize
    }
}

/// Lowercased alphanumeric words, stop words and one-letter words removed.
fn content_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 1)
        .map(str::to_lowercase)
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
}

#[async_trait::async_trait]
impl EmbeddingProvider for TrigramProvider {
    fn provider_name(&self) -> &str {
        "trigram"
    }

    fn model_name(&self) -> &str {
        "trigram-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.vectorize(text)).collect())
    }
}
