//! Embedding providers for knowledge sections and queries.
//!
//! Providers are selected from configuration and shared behind an `Arc`; the
//! same provider must embed both the sections and the queries so that their
//! vectors are comparable.

pub mod config;
pub mod provider;
pub mod providers;

pub use config::EmbeddingConfig;
pub use provider::{create_provider, EmbeddingProvider};
