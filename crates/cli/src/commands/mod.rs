//! Command handlers for the faqbot CLI.

pub mod chat;
pub mod feedback;
pub mod repl;
pub mod sections;

pub use chat::ChatCommand;
pub use feedback::FeedbackCommand;
pub use repl::ReplCommand;
pub use sections::SectionsCommand;
