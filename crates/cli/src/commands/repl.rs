//! Interactive question loop.

use clap::Args;
use faqbot_core::{config::AppConfig, AppResult};
use faqbot_knowledge::EngineBuilder;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Interactive question loop
#[derive(Args, Debug)]
pub struct ReplCommand {
    /// Run every question through the feedback loop
    #[arg(long)]
    pub feedback: bool,
}

impl ReplCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing repl command");

        let engine = EngineBuilder::from_config(config).await?;
        println!(
            "Loaded {} sections from {}. Type 'exit' or 'quit' to leave.",
            engine.sections().len(),
            config.document.display()
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                println!();
                break;
            };

            let query = line.trim();
            if is_exit(query) {
                break;
            }

            let reply = if self.feedback {
                engine.process_with_feedback(query).await
            } else {
                engine.chat(query).await
            };
            println!("{}\n", reply);
        }

        tracing::debug!("Leaving repl");
        Ok(())
    }
}

fn is_exit(line: &str) -> bool {
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}
