//! Support engine: retrieval, extraction and the feedback refinement loop.
//!
//! A [`SupportEngine`] is built once from a knowledge document and then
//! answers any number of queries. It holds no per-query state; the refinement
//! history lives on the stack of [`SupportEngine::refine`].

use crate::document::load_document_or_empty;
use crate::embeddings::{create_provider, EmbeddingConfig, EmbeddingProvider};
use crate::extract::{create_extractor, AnswerExtractor};
use crate::feedback::{FeedbackSimulator, RandomFeedback};
use crate::index::EmbeddingIndex;
use crate::matcher;
use crate::segmenter::segment;
use crate::types::{FeedbackLabel, MatchResult, RefinementOutcome, RefinementStep, Section};
use faqbot_core::config::PolicySettings;
use faqbot_core::logging::AUDIT_TARGET;
use faqbot_core::{AppConfig, AppResult};
use std::path::Path;
use std::sync::Arc;

/// Hard bound on feedback iterations per query.
pub const MAX_REFINEMENTS: usize = 2;

/// Reply to an empty or whitespace-only query.
pub const EMPTY_QUERY_PROMPT: &str = "Please enter a question.";

/// Reply when extraction fails.
pub const EXTRACTION_APOLOGY: &str = "I encountered an error. Please try rephrasing your question.";

/// Appended to the query when the previous answer was not helpful.
pub const CLARIFY_SUFFIX: &str = " Please provide more details.";

const NO_INFORMATION: &str = "I don't have enough information to answer that.";

/// Retrieval policy.
#[derive(Debug, Clone, PartialEq)]
pub struct EnginePolicy {
    /// Minimum cosine similarity for a section to be used
    pub confidence_threshold: f32,

    /// Contact line appended to the "not enough information" reply
    pub contact: String,

    /// Characters of the section quoted by a "too vague" adjustment
    pub context_preview_chars: usize,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self::from(&PolicySettings::default())
    }
}

impl From<&PolicySettings> for EnginePolicy {
    fn from(settings: &PolicySettings) -> Self {
        Self {
            confidence_threshold: settings.confidence_threshold,
            contact: settings.contact.clone(),
            context_preview_chars: 200,
        }
    }
}

impl EnginePolicy {
    /// The reply given when no section passes the confidence gate.
    pub fn no_information_reply(&self) -> String {
        if self.contact.trim().is_empty() {
            NO_INFORMATION.to_string()
        } else {
            format!("{} {}", NO_INFORMATION, self.contact.trim())
        }
    }
}

/// Assembles a [`SupportEngine`] from its collaborators.
#[derive(Debug)]
pub struct EngineBuilder {
    embedder: Arc<dyn EmbeddingProvider>,
    extractor: Arc<dyn AnswerExtractor>,
    feedback: Option<Arc<dyn FeedbackSimulator>>,
    policy: EnginePolicy,
}

impl EngineBuilder {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, extractor: Arc<dyn AnswerExtractor>) -> Self {
        Self {
            embedder,
            extractor,
            feedback: None,
            policy: EnginePolicy::default(),
        }
    }

    /// Replace the default entropy-seeded feedback simulator.
    pub fn with_feedback(mut self, feedback: Arc<dyn FeedbackSimulator>) -> Self {
        self.feedback = Some(feedback);
        self
    }

    pub fn with_policy(mut self, policy: EnginePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build an engine answering from `text`.
    pub async fn build_from_text(self, text: &str) -> AppResult<SupportEngine> {
        let sections = segment(text);
        let index = EmbeddingIndex::build(sections, self.embedder).await?;

        let feedback = match self.feedback {
            Some(feedback) => feedback,
            None => Arc::new(RandomFeedback::new(Default::default())?),
        };

        Ok(SupportEngine {
            index,
            extractor: self.extractor,
            feedback,
            policy: self.policy,
        })
    }

    /// Build an engine answering from the document at `path`.
    ///
    /// An unreadable document yields an engine with no knowledge.
    pub async fn build_from_document(self, path: &Path) -> AppResult<SupportEngine> {
        let text = load_document_or_empty(path);
        let engine = self.build_from_text(&text).await?;

        tracing::info!(
            target: AUDIT_TARGET,
            sections = engine.sections().len(),
            "Loaded document: {} with {} sections",
            path.display(),
            engine.sections().len()
        );

        Ok(engine)
    }

    /// Builder with every collaborator taken from configuration.
    pub async fn configured(config: &AppConfig) -> AppResult<Self> {
        config.validate()?;

        let embedding_config = EmbeddingConfig::from_settings(&config.embedding);
        let embedder = create_provider(&embedding_config).await?;

        let extractor = create_extractor(&config.extractor, config.extractor_endpoint())?;
        let feedback = RandomFeedback::from_settings(&config.feedback)?;

        tracing::debug!(
            "Engine collaborators: embedder={} ({}), extractor={}",
            embedder.provider_name(),
            embedder.model_name(),
            extractor.name()
        );

        Ok(Self::new(embedder, extractor)
            .with_feedback(Arc::new(feedback))
            .with_policy(EnginePolicy::from(&config.policy)))
    }

    /// Build an engine from configuration over the configured document.
    pub async fn from_config(config: &AppConfig) -> AppResult<SupportEngine> {
        Self::configured(config)
            .await?
            .build_from_document(&config.document)
            .await
    }
}

/// FAQ support bot over one knowledge document.
#[derive(Debug, Clone)]
pub struct SupportEngine {
    index: EmbeddingIndex,
    extractor: Arc<dyn AnswerExtractor>,
    feedback: Arc<dyn FeedbackSimulator>,
    policy: EnginePolicy,
}

impl SupportEngine {
    pub fn sections(&self) -> &[Section] {
        self.index.sections()
    }

    pub fn index(&self) -> &EmbeddingIndex {
        &self.index
    }

    pub fn policy(&self) -> &EnginePolicy {
        &self.policy
    }

    pub fn extractor(&self) -> &dyn AnswerExtractor {
        self.extractor.as_ref()
    }

    /// Best section for `query`, gated by the policy threshold.
    pub async fn find_relevant_section(&self, query: &str) -> AppResult<MatchResult<'_>> {
        matcher::find_relevant_section(&self.index, query, self.policy.confidence_threshold).await
    }

    /// Answer `query` from the knowledge document.
    ///
    /// Never fails: a missing section yields the "not enough information"
    /// reply and any embedding or extraction error yields the apology.
    pub async fn answer_query(&self, query: &str) -> String {
        let matched = match self.find_relevant_section(query).await {
            Ok(matched) => matched,
            Err(e) => {
                tracing::warn!("Failed to match query: {}", e);
                return EXTRACTION_APOLOGY.to_string();
            }
        };

        let Some(section) = matched.section else {
            return self.policy.no_information_reply();
        };

        match self.extractor.extract(query, &section.text).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("Extractor '{}' failed: {}", self.extractor.name(), e);
                EXTRACTION_APOLOGY.to_string()
            }
        }
    }

    /// Revise `response` according to `feedback`.
    pub async fn adjust_response(
        &self,
        query: &str,
        response: &str,
        feedback: FeedbackLabel,
    ) -> String {
        match feedback {
            FeedbackLabel::Good => response.to_string(),
            FeedbackLabel::TooVague => match self.find_relevant_section(query).await {
                Ok(MatchResult {
                    section: Some(section),
                    ..
                }) => format!(
                    "{}\n\nAdditional context: {}...",
                    response,
                    section.preview(self.policy.context_preview_chars)
                ),
                Ok(_) => response.to_string(),
                Err(e) => {
                    tracing::warn!("Failed to re-match query for more context: {}", e);
                    response.to_string()
                }
            },
            FeedbackLabel::NotHelpful => {
                self.answer_query(&format!("{}{}", query, CLARIFY_SUFFIX))
                    .await
            }
        }
    }

    /// Single-shot answer without feedback.
    pub async fn chat(&self, query: &str) -> String {
        if query.trim().is_empty() {
            return EMPTY_QUERY_PROMPT.to_string();
        }
        self.answer_query(query).await
    }

    /// Answer `query` and run the bounded feedback loop.
    ///
    /// Callers must reject empty queries first; [`SupportEngine::process_with_feedback`]
    /// does so.
    pub async fn refine(&self, query: &str) -> RefinementOutcome {
        tracing::info!(target: AUDIT_TARGET, "NEW QUERY: {}", query);

        let mut response = self.answer_query(query).await;
        let mut outcome = RefinementOutcome::new(query, response.clone());

        for iteration in 1..=MAX_REFINEMENTS {
            let feedback = self.feedback.sample(&response);

            if feedback == FeedbackLabel::Good {
                outcome.steps.push(RefinementStep {
                    iteration,
                    feedback,
                    adjusted: None,
                });
                break;
            }

            response = self.adjust_response(query, &response, feedback).await;
            outcome.steps.push(RefinementStep {
                iteration,
                feedback,
                adjusted: Some(response.clone()),
            });
        }

        tracing::debug!(
            "Refinement finished after {} iteration(s), accepted: {}",
            outcome.iterations(),
            outcome.accepted()
        );

        outcome
    }

    /// Answer `query` with feedback and render the transcript.
    pub async fn process_with_feedback(&self, query: &str) -> String {
        if query.trim().is_empty() {
            return EMPTY_QUERY_PROMPT.to_string();
        }
        self.refine(query).await.render()
    }
}
