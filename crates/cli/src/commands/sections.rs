//! Sections command handler.

use clap::Args;
use faqbot_core::{config::AppConfig, AppResult};
use faqbot_knowledge::EngineBuilder;

/// Show the sections of the knowledge document
#[derive(Args, Debug)]
pub struct SectionsCommand {
    /// Characters of each section to show
    #[arg(long, default_value = "80")]
    pub preview: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SectionsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing sections command");

        let engine = EngineBuilder::from_config(config).await?;
        let provider = engine.index().provider();

        if self.json {
            let output = serde_json::json!({
                "document": config.document,
                "sectionsCount": engine.sections().len(),
                "provider": provider.provider_name(),
                "model": provider.model_name(),
                "dimensions": provider.dimensions(),
                "confidenceThreshold": engine.policy().confidence_threshold,
                "sections": engine.sections(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!("Document:   {}", config.document.display());
        println!("Sections:   {}", engine.sections().len());
        println!(
            "Embeddings: {} ({}, {} dimensions)",
            provider.provider_name(),
            provider.model_name(),
            provider.dimensions()
        );
        println!("Threshold:  {:.2}", engine.policy().confidence_threshold);

        for section in engine.sections() {
            let preview = section.preview(self.preview).replace('\n', " ");
            let ellipsis = if section.text.chars().count() > self.preview {
                "..."
            } else {
                ""
            };
            println!("\n[{}] {}{}", section.position, preview, ellipsis);
        }

        Ok(())
    }
}
