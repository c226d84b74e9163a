//! faqbot CLI
//!
//! Command-line front end for the FAQ support bot.

mod commands;

use clap::{Parser, Subcommand};
use commands::{ChatCommand, FeedbackCommand, ReplCommand, SectionsCommand};
use faqbot_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// faqbot - answer customer questions from an FAQ document
#[derive(Parser, Debug)]
#[command(name = "faqbot")]
#[command(about = "Answer customer questions from an FAQ document", long_about = None)]
#[command(version)]
struct Cli {
    /// Knowledge document (default: faq.txt)
    #[arg(short, long, global = true, env = "FAQBOT_DOCUMENT")]
    document: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "FAQBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Append logs to this file as well as stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Embedding provider (trigram, ollama)
    #[arg(short, long, global = true, env = "FAQBOT_EMBEDDING_PROVIDER")]
    embedding_provider: Option<String>,

    /// Answer extractor (keyword, ollama)
    #[arg(short = 'x', long, global = true, env = "FAQBOT_EXTRACTOR")]
    extractor: Option<String>,

    /// Extraction model identifier
    #[arg(short, long, global = true, env = "FAQBOT_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a single question
    Chat(ChatCommand),

    /// Answer a question and refine it with simulated feedback
    Feedback(FeedbackCommand),

    /// Interactive question loop
    Repl(ReplCommand),

    /// Show the sections of the knowledge document
    Sections(SectionsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_with(cli.config)?;

    let config = config.with_overrides(
        cli.document,
        cli.embedding_provider,
        cli.extractor,
        cli.model,
        cli.log_level,
        cli.log_file,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(
        config.log_level.as_deref(),
        config.no_color,
        config.log_file.as_deref(),
    )?;

    tracing::info!("faqbot starting");
    tracing::debug!("Config file: {:?}", config.config_file);
    tracing::debug!("Document: {:?}", config.document);
    tracing::debug!(
        "Embedding provider: {} ({})",
        config.embedding.provider,
        config.embedding.model
    );
    tracing::debug!("Extractor: {} ({})", config.extractor.kind, config.extractor.model);

    let command_name = match &cli.command {
        Commands::Chat(_) => "chat",
        Commands::Feedback(_) => "feedback",
        Commands::Repl(_) => "repl",
        Commands::Sections(_) => "sections",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Feedback(cmd) => cmd.execute(&config).await,
        Commands::Repl(cmd) => cmd.execute(&config).await,
        Commands::Sections(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
