//! Relevance matching of a query against the embedding index.

use crate::index::EmbeddingIndex;
use crate::types::MatchResult;
use faqbot_core::logging::AUDIT_TARGET;
use faqbot_core::AppResult;

/// Minimum cosine similarity for a section to count as relevant.
///
/// Below this score the bot declares it has no knowledge about the question.
pub const CONFIDENCE_THRESHOLD: f32 = 0.30;

/// Cosine similarity of two vectors.
///
/// Returns 0.0 when either vector has zero norm or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Index and score of the most similar embedding.
///
/// Ties keep the earliest index.
pub fn best_match(query: &[f32], embeddings: &[Vec<f32>]) -> Option<(usize, f32)> {
    embeddings
        .iter()
        .map(|embedding| cosine_similarity(query, embedding))
        .enumerate()
        .fold(None, |best, (idx, score)| match best {
            Some((_, best_score)) if score <= best_score => best,
            _ => Some((idx, score)),
        })
}

/// Find the section most relevant to `query`, gated by `threshold`.
///
/// An empty index short-circuits to an empty result without embedding the query.
pub async fn find_relevant_section<'a>(
    index: &'a EmbeddingIndex,
    query: &str,
    threshold: f32,
) -> AppResult<MatchResult<'a>> {
    if index.is_empty() {
        return Ok(MatchResult::empty());
    }

    let query_embedding = index.embed_query(query).await?;

    let Some((best_idx, best_score)) = best_match(&query_embedding, index.embeddings()) else {
        return Ok(MatchResult::empty());
    };

    tracing::info!(
        target: AUDIT_TARGET,
        score = best_score,
        section = best_idx,
        "Query: '{}' | Match score: {:.3}",
        query,
        best_score
    );

    let section = if best_score >= threshold {
        index.sections().get(best_idx)
    } else {
        None
    };

    Ok(MatchResult {
        section,
        score: Some(best_score),
    })
}
