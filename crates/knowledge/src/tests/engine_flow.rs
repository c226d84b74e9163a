//! End-to-end behaviour of the support engine with deterministic collaborators.

use super::support::{EchoExtractor, FailingExtractor, FixedEmbedder};
use crate::embeddings::providers::TrigramProvider;
use crate::engine::{
    EngineBuilder, EnginePolicy, SupportEngine, CLARIFY_SUFFIX, EMPTY_QUERY_PROMPT,
    EXTRACTION_APOLOGY, MAX_REFINEMENTS,
};
use crate::extract::{AnswerExtractor, KeywordExtractor};
use crate::feedback::ScriptedFeedback;
use crate::types::FeedbackLabel;
use std::sync::Arc;
use tempfile::TempDir;

const PASSWORD: &str = "Reset your password from the Settings page.";
const REFUND: &str = "Refunds are issued within 30 days.";
const NO_INFO: &str = "I don't have enough information to answer that. \
                       Please contact support@example.com or call 1-800-555-1234.";

fn document() -> String {
    format!("{}\n\n{}", PASSWORD, REFUND)
}

fn embedder() -> FixedEmbedder {
    FixedEmbedder::new(3)
        .with(PASSWORD, vec![1.0, 0.0, 0.0])
        .with(REFUND, vec![0.0, 1.0, 0.0])
        .with("reset password?", vec![0.9, 0.1, 0.0])
        .with("refund?", vec![0.1, 1.0, 0.0])
        .with("weather?", vec![0.0, 0.0, 1.0])
        .with(
            "refund? Please provide more details.",
            vec![0.8, 0.2, 0.0],
        )
        .failing_on("boom")
}

struct Harness {
    engine: SupportEngine,
    embedder: Arc<FixedEmbedder>,
    feedback: Arc<ScriptedFeedback>,
}

async fn harness(
    extractor: Arc<dyn AnswerExtractor>,
    script: Vec<FeedbackLabel>,
) -> Harness {
    let embedder = Arc::new(embedder());
    let feedback = Arc::new(ScriptedFeedback::new(script));

    let engine = EngineBuilder::new(embedder.clone(), extractor)
        .with_feedback(feedback.clone())
        .build_from_text(&document())
        .await
        .unwrap();

    Harness {
        engine,
        embedder,
        feedback,
    }
}

async fn echo_harness(script: Vec<FeedbackLabel>) -> Harness {
    harness(Arc::new(EchoExtractor::default()), script).await
}

#[tokio::test]
async fn test_empty_query_short_circuits() {
    let extractor = Arc::new(EchoExtractor::default());
    let h = harness(extractor.clone(), vec![FeedbackLabel::NotHelpful]).await;

    assert_eq!(h.engine.chat("").await, EMPTY_QUERY_PROMPT);
    assert_eq!(h.engine.chat("   ").await, EMPTY_QUERY_PROMPT);
    assert_eq!(h.engine.process_with_feedback("\t\n").await, EMPTY_QUERY_PROMPT);

    // only the index build touched the embedder
    assert_eq!(h.embedder.calls(), 1);
    assert_eq!(extractor.calls(), 0);
    assert_eq!(h.feedback.calls(), 0);
}

#[tokio::test]
async fn test_chat_answers_from_best_section() {
    let h = echo_harness(vec![]).await;

    assert_eq!(h.engine.chat("refund?").await, format!("from: {}", REFUND));
    assert_eq!(h.engine.chat("reset password?").await, format!("from: {}", PASSWORD));
    assert_eq!(h.feedback.calls(), 0);
}

#[tokio::test]
async fn test_unmatched_query_gets_contact_reply() {
    let h = echo_harness(vec![]).await;
    assert_eq!(h.engine.chat("weather?").await, NO_INFO);
}

#[tokio::test]
async fn test_failing_extractor_gives_apology() {
    let h = harness(Arc::new(FailingExtractor), vec![]).await;
    assert_eq!(h.engine.chat("refund?").await, EXTRACTION_APOLOGY);
}

#[tokio::test]
async fn test_query_embedding_failure_gives_apology() {
    let h = echo_harness(vec![]).await;

    assert_eq!(h.engine.chat("boom").await, EXTRACTION_APOLOGY);
    // the index survives the failure
    assert_eq!(h.engine.chat("refund?").await, format!("from: {}", REFUND));
}

#[tokio::test]
async fn test_good_first_stops_after_one_iteration() {
    let h = echo_harness(vec![FeedbackLabel::Good, FeedbackLabel::NotHelpful]).await;

    let outcome = h.engine.refine("refund?").await;
    assert_eq!(outcome.iterations(), 1);
    assert!(outcome.accepted());
    assert_eq!(h.feedback.calls(), 1);

    assert_eq!(
        outcome.render(),
        format!(
            "**Initial Response:** from: {}\n\n**Feedback 1:** ✅ Good",
            REFUND
        )
    );
}

#[tokio::test]
async fn test_never_satisfied_stops_at_bound() {
    let h = echo_harness(vec![FeedbackLabel::NotHelpful]).await;

    let outcome = h.engine.refine("weather?").await;
    assert_eq!(outcome.iterations(), MAX_REFINEMENTS);
    assert_eq!(h.feedback.calls(), MAX_REFINEMENTS);
    assert!(!outcome.accepted());
    assert!(outcome
        .steps
        .iter()
        .all(|step| step.feedback == FeedbackLabel::NotHelpful));
}

#[tokio::test]
async fn test_not_helpful_reanswers_clarified_query() {
    let extractor = Arc::new(EchoExtractor::default());
    let h = harness(extractor.clone(), vec![FeedbackLabel::NotHelpful]).await;

    // the clarified query lands on a different section than the raw one
    let transcript = h.engine.process_with_feedback("refund?").await;
    let initial = format!("from: {}", REFUND);
    let adjusted = format!("from: {}", PASSWORD);
    let expected = format!(
        "**Initial Response:** {initial}\n\
         \n**Feedback 1:** ⚠️ Not Helpful\n\
         **Adjusted Response:** {adjusted}\n\
         \n**Feedback 2:** ⚠️ Not Helpful\n\
         **Adjusted Response:** {adjusted}"
    );
    assert_eq!(transcript, expected);

    let clarified = format!("refund?{}", CLARIFY_SUFFIX);
    assert_eq!(
        extractor.questions(),
        vec!["refund?".to_string(), clarified.clone(), clarified]
    );
}

#[tokio::test]
async fn test_too_vague_appends_section_preview() {
    let long_section = format!("Shipping: {}", "x".repeat(300));
    let query = "shipping?";
    let embedder = FixedEmbedder::new(2)
        .with(&long_section, vec![1.0, 0.0])
        .with(query, vec![1.0, 0.0]);
    let feedback = Arc::new(ScriptedFeedback::new(vec![
        FeedbackLabel::TooVague,
        FeedbackLabel::Good,
    ]));

    let engine = EngineBuilder::new(Arc::new(embedder), Arc::new(EchoExtractor::default()))
        .with_feedback(feedback.clone())
        .build_from_text(&long_section)
        .await
        .unwrap();

    let outcome = engine.refine(query).await;
    let initial = format!("from: {}", long_section);
    let preview: String = long_section.chars().take(200).collect();

    assert_eq!(outcome.initial, initial);
    assert_eq!(outcome.iterations(), 2);
    assert_eq!(
        outcome.steps[0].adjusted.as_deref(),
        Some(format!("{}\n\nAdditional context: {}...", initial, preview).as_str())
    );
    assert_eq!(outcome.steps[1].feedback, FeedbackLabel::Good);
    assert_eq!(outcome.final_response(), outcome.steps[0].adjusted.as_deref().unwrap());
}

#[tokio::test]
async fn test_too_vague_without_match_keeps_response() {
    let h = echo_harness(vec![FeedbackLabel::TooVague]).await;

    let outcome = h.engine.refine("weather?").await;
    assert_eq!(outcome.initial, NO_INFO);
    assert_eq!(outcome.iterations(), 2);
    assert!(outcome
        .steps
        .iter()
        .all(|step| step.adjusted.as_deref() == Some(NO_INFO)));
}

#[tokio::test]
async fn test_empty_document_never_embeds() {
    let embedder = Arc::new(FixedEmbedder::new(3));
    let engine = EngineBuilder::new(embedder.clone(), Arc::new(EchoExtractor::default()))
        .with_feedback(Arc::new(ScriptedFeedback::always(FeedbackLabel::Good)))
        .build_from_text("  \n\n  ")
        .await
        .unwrap();

    assert!(engine.sections().is_empty());
    assert_eq!(engine.chat("anything?").await, NO_INFO);
    assert_eq!(
        engine.process_with_feedback("anything?").await,
        format!("**Initial Response:** {}\n\n**Feedback 1:** ✅ Good", NO_INFO)
    );
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn test_missing_document_degrades_to_empty_engine() {
    let temp = TempDir::new().unwrap();
    let engine = EngineBuilder::new(
        Arc::new(FixedEmbedder::new(3)),
        Arc::new(EchoExtractor::default()),
    )
    .build_from_document(&temp.path().join("missing.txt"))
    .await
    .unwrap();

    assert!(engine.sections().is_empty());
    assert_eq!(engine.chat("hours?").await, NO_INFO);
}

#[tokio::test]
async fn test_build_from_document() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("faq.txt");
    std::fs::write(&path, document()).unwrap();

    let engine = EngineBuilder::new(Arc::new(embedder()), Arc::new(EchoExtractor::default()))
        .build_from_document(&path)
        .await
        .unwrap();

    assert_eq!(engine.sections().len(), 2);
    assert_eq!(engine.sections()[1].text, REFUND);
}

#[tokio::test]
async fn test_policy_overrides() {
    let policy = EnginePolicy {
        confidence_threshold: 0.999,
        contact: String::new(),
        ..Default::default()
    };
    let engine = EngineBuilder::new(Arc::new(embedder()), Arc::new(EchoExtractor::default()))
        .with_policy(policy)
        .build_from_text(&document())
        .await
        .unwrap();

    // cosine of "reset password?" with its section is about 0.994
    assert_eq!(
        engine.chat("reset password?").await,
        "I don't have enough information to answer that."
    );
    assert_eq!(engine.chat("refund?").await, "I don't have enough information to answer that.");
}

#[tokio::test]
async fn test_offline_stack_answers_faq() {
    let faq = "Q: How do I reset my password?\n\
               A: Go to Settings > Security and click Reset Password.\n\n\
               Q: What is your refund policy?\n\
               A: Refunds are available within 30 days of purchase.";

    let engine = EngineBuilder::new(
        Arc::new(TrigramProvider::new(384)),
        Arc::new(KeywordExtractor::new()),
    )
    .with_feedback(Arc::new(ScriptedFeedback::always(FeedbackLabel::Good)))
    .build_from_text(faq)
    .await
    .unwrap();

    assert_eq!(
        engine.chat("How do I reset my password?").await,
        "Go to Settings > Security and click Reset Password."
    );
    assert_eq!(
        engine.chat("What is your refund policy?").await,
        "Refunds are available within 30 days of purchase."
    );
}

#[test]
fn test_engine_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SupportEngine>();
}

#[test]
fn test_default_policy_uses_confidence_threshold() {
    assert_eq!(
        EnginePolicy::default().confidence_threshold,
        crate::matcher::CONFIDENCE_THRESHOLD
    );
}

#[tokio::test]
async fn test_from_config_uses_offline_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("faq.txt");
    std::fs::write(
        &path,
        "Q: What are your opening hours?\nA: We are open 9am to 5pm on weekdays.\n\n\
         Q: Do you ship abroad?\nA: We ship to 40 countries.",
    )
    .unwrap();

    let config = faqbot_core::AppConfig {
        document: path,
        ..Default::default()
    };
    let engine = EngineBuilder::from_config(&config).await.unwrap();

    assert_eq!(engine.sections().len(), 2);
    assert_eq!(engine.index().provider().provider_name(), "trigram");
    assert_eq!(engine.extractor().name(), "keyword");
    assert_eq!(engine.policy(), &EnginePolicy::default());
}

#[tokio::test]
async fn test_from_config_rejects_invalid_config() {
    let mut config = faqbot_core::AppConfig::default();
    config.feedback.good_weight = -1.0;

    assert!(EngineBuilder::from_config(&config).await.is_err());
}
