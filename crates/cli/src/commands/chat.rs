//! Chat command handler.

use clap::Args;
use faqbot_core::{config::AppConfig, AppResult};
use faqbot_knowledge::EngineBuilder;

/// Answer a single question
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// The question to answer
    pub query: String,
}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let engine = EngineBuilder::from_config(config).await?;
        let answer = engine.chat(&self.query).await;

        println!("{}", answer);
        Ok(())
    }
}
