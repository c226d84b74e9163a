//! FAQ knowledge base and support engine.
//!
//! A knowledge document is split into sections, each section is embedded once,
//! and queries are answered from the most similar section when it clears a
//! confidence threshold. Answers can be put through a short simulated feedback
//! loop that refines them.

pub mod document;
pub mod embeddings;
pub mod engine;
pub mod extract;
pub mod feedback;
pub mod index;
pub mod matcher;
pub mod segmenter;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use engine::{EngineBuilder, EnginePolicy, SupportEngine, MAX_REFINEMENTS};
pub use extract::{create_extractor, AnswerExtractor};
pub use feedback::{FeedbackSimulator, FeedbackWeights, RandomFeedback, ScriptedFeedback};
pub use index::EmbeddingIndex;
pub use matcher::CONFIDENCE_THRESHOLD;
pub use types::{FeedbackLabel, MatchResult, RefinementOutcome, RefinementStep, Section};
