//! Feedback command handler.
//!
//! Answers a question, then runs the simulated feedback loop and prints the
//! transcript of initial response, feedback labels and adjustments.

use clap::Args;
use faqbot_core::{config::AppConfig, AppResult};
use faqbot_knowledge::engine::EMPTY_QUERY_PROMPT;
use faqbot_knowledge::{EngineBuilder, ScriptedFeedback};
use std::sync::Arc;

/// Answer a question and refine it with simulated feedback
#[derive(Args, Debug)]
pub struct FeedbackCommand {
    /// The question to answer
    pub query: String,

    /// Seed for reproducible random feedback
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fixed feedback sequence instead of random draws (e.g. too_vague,good)
    #[arg(long, conflicts_with = "seed")]
    pub script: Option<String>,

    /// Output the refinement history as JSON
    #[arg(long)]
    pub json: bool,
}

impl FeedbackCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing feedback command");
        tracing::debug!("Feedback options: {:?}", self);

        let mut config = config.clone();
        if let Some(seed) = self.seed {
            config.feedback.seed = Some(seed);
        }

        let mut builder = EngineBuilder::configured(&config).await?;
        if let Some(script) = &self.script {
            builder = builder.with_feedback(Arc::new(ScriptedFeedback::parse(script)?));
        }
        let engine = builder.build_from_document(&config.document).await?;

        if !self.json {
            println!("{}", engine.process_with_feedback(&self.query).await);
            return Ok(());
        }

        let output = if self.query.trim().is_empty() {
            serde_json::json!({
                "query": self.query,
                "message": EMPTY_QUERY_PROMPT,
            })
        } else {
            let outcome = engine.refine(&self.query).await;
            serde_json::json!({
                "query": &outcome.query,
                "initial": &outcome.initial,
                "steps": &outcome.steps,
                "accepted": outcome.accepted(),
                "finalResponse": outcome.final_response(),
            })
        };

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}
