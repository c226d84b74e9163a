//! Configuration management for faqbot.
//!
//! Configuration is merged from several sources, lowest precedence first:
//! - Built-in defaults
//! - A YAML config file (`FAQBOT_CONFIG`, `--config`, or `./faqbot.yaml`)
//! - Environment variables
//! - Command-line flags

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "faqbot.yaml";

/// Default knowledge document.
pub const DEFAULT_DOCUMENT: &str = "faq.txt";

/// Default Ollama endpoint.
pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";

const KNOWN_EMBEDDING_PROVIDERS: [&str; 2] = ["trigram", "ollama"];
const KNOWN_EXTRACTORS: [&str; 2] = ["keyword", "ollama"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Knowledge document to answer from
    pub document: PathBuf,

    /// Config file that was merged, if any
    pub config_file: Option<PathBuf>,

    /// Embedding provider settings
    pub embedding: EmbeddingSettings,

    /// Answer extractor settings
    pub extractor: ExtractorSettings,

    /// Retrieval policy settings
    pub policy: PolicySettings,

    /// Feedback simulation settings
    pub feedback: FeedbackSettings,

    /// Log filter override
    pub log_level: Option<String>,

    /// Append-only log file for the audit trail
    pub log_file: Option<PathBuf>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Embedding provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmbeddingSettings {
    /// "trigram" (offline) or "ollama"
    pub provider: String,
    pub model: String,
    pub dimensions: usize,
    pub endpoint: Option<String>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self::for_provider("trigram")
    }
}

impl EmbeddingSettings {
    /// Model and dimensions a provider serves out of the box.
    pub fn for_provider(provider: &str) -> Self {
        let (model, dimensions) = match provider {
            "ollama" => ("nomic-embed-text", 768),
            _ => ("trigram-v1", 384),
        };

        Self {
            provider: provider.to_string(),
            model: model.to_string(),
            dimensions,
            endpoint: None,
        }
    }

    /// Switch to another provider, taking its default model and dimensions.
    ///
    /// Selecting the current provider again keeps the model and dimensions.
    pub fn switch_provider(&mut self, provider: String) {
        if self.provider == provider {
            return;
        }
        let endpoint = self.endpoint.take();
        *self = Self {
            endpoint,
            ..Self::for_provider(&provider)
        };
    }
}

/// Answer extractor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractorSettings {
    /// "keyword" (offline) or "ollama"
    pub kind: String,
    pub model: String,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            kind: "keyword".to_string(),
            model: "llama3.2".to_string(),
            endpoint: None,
            timeout_secs: Some(30),
        }
    }
}

/// Retrieval policy settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PolicySettings {
    /// Minimum cosine similarity for a section to count as relevant
    pub confidence_threshold: f32,

    /// Contact line appended to the "not enough information" fallback
    pub contact: String,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.30,
            contact: "Please contact support@example.com or call 1-800-555-1234.".to_string(),
        }
    }
}

/// Feedback simulation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeedbackSettings {
    pub not_helpful_weight: f64,
    pub too_vague_weight: f64,
    pub good_weight: f64,

    /// Seed for reproducible simulations
    pub seed: Option<u64>,
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self {
            not_helpful_weight: 0.2,
            too_vague_weight: 0.3,
            good_weight: 0.5,
            seed: None,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    document: Option<PathBuf>,
    embedding: Option<EmbeddingSection>,
    extractor: Option<ExtractorSettings>,
    policy: Option<PolicySettings>,
    feedback: Option<FeedbackSettings>,
    logging: Option<LoggingConfig>,
}

/// `embedding` section as written; unset fields follow the chosen provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct EmbeddingSection {
    provider: Option<String>,
    model: Option<String>,
    dimensions: Option<usize>,
    endpoint: Option<String>,
}

impl EmbeddingSection {
    fn resolve(self) -> EmbeddingSettings {
        let mut settings =
            EmbeddingSettings::for_provider(self.provider.as_deref().unwrap_or("trigram"));
        if let Some(model) = self.model {
            settings.model = model;
        }
        if let Some(dimensions) = self.dimensions {
            settings.dimensions = dimensions;
        }
        settings.endpoint = self.endpoint;
        settings
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
    file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            document: PathBuf::from(DEFAULT_DOCUMENT),
            config_file: None,
            embedding: EmbeddingSettings::default(),
            extractor: ExtractorSettings::default(),
            policy: PolicySettings::default(),
            feedback: FeedbackSettings::default(),
            log_level: None,
            log_file: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file, environment variables and defaults.
    ///
    /// An explicit `config_file` takes priority over `FAQBOT_CONFIG`; without
    /// either, `./faqbot.yaml` is merged when present.
    ///
    /// Environment variables:
    /// - `FAQBOT_CONFIG`: Path to config file
    /// - `FAQBOT_DOCUMENT`: Knowledge document
    /// - `FAQBOT_EMBEDDING_PROVIDER`: Embedding provider
    /// - `FAQBOT_EXTRACTOR`: Answer extractor
    /// - `FAQBOT_MODEL`: Extraction model
    /// - `OLLAMA_URL`: Ollama endpoint for both embeddings and extraction
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load_with(config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        let explicit = config_file.or_else(|| std::env::var("FAQBOT_CONFIG").ok().map(PathBuf::from));

        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        path
                    )));
                }
                config = config.merge_yaml(&path)?;
            }
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    config = config.merge_yaml(&fallback)?;
                }
            }
        }

        // Environment variables override YAML config
        if let Ok(document) = std::env::var("FAQBOT_DOCUMENT") {
            config.document = PathBuf::from(document);
        }

        if let Ok(provider) = std::env::var("FAQBOT_EMBEDDING_PROVIDER") {
            config.embedding.switch_provider(provider);
        }

        if let Ok(extractor) = std::env::var("FAQBOT_EXTRACTOR") {
            config.extractor.kind = extractor;
        }

        if let Ok(model) = std::env::var("FAQBOT_MODEL") {
            config.extractor.model = model;
        }

        if let Ok(endpoint) = std::env::var("OLLAMA_URL") {
            config.embedding.endpoint = Some(endpoint.clone());
            config.extractor.endpoint = Some(endpoint);
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone().merge_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;
        result.config_file = Some(path.to_path_buf());

        Ok(result)
    }

    /// Merge YAML text into this config. Sections present in the text replace
    /// the current ones; missing fields inside a section take their defaults.
    pub fn merge_str(mut self, yaml: &str) -> AppResult<Self> {
        let config_file: ConfigFile = serde_yaml::from_str(yaml)?;

        if let Some(document) = config_file.document {
            self.document = document;
        }
        if let Some(embedding) = config_file.embedding {
            self.embedding = embedding.resolve();
        }
        if let Some(extractor) = config_file.extractor {
            self.extractor = extractor;
        }
        if let Some(policy) = config_file.policy {
            self.policy = policy;
        }
        if let Some(feedback) = config_file.feedback {
            self.feedback = feedback;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                self.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                self.no_color = !color;
            }
            if let Some(file) = logging.file {
                self.log_file = Some(file);
            }
        }

        Ok(self)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        document: Option<PathBuf>,
        embedding_provider: Option<String>,
        extractor: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        log_file: Option<PathBuf>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(document) = document {
            self.document = document;
        }

        if let Some(provider) = embedding_provider {
            self.embedding.switch_provider(provider);
        }

        if let Some(extractor) = extractor {
            self.extractor.kind = extractor;
        }

        if let Some(model) = model {
            self.extractor.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if let Some(log_file) = log_file {
            self.log_file = Some(log_file);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Ollama endpoint used for extraction.
    pub fn extractor_endpoint(&self) -> &str {
        self.extractor
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_OLLAMA_ENDPOINT)
    }

    /// Validate the merged configuration.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.embedding.provider.as_str();
        if !KNOWN_EMBEDDING_PROVIDERS.contains(&provider) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                provider,
                KNOWN_EMBEDDING_PROVIDERS.join(", ")
            )));
        }

        let extractor = self.extractor.kind.as_str();
        if !KNOWN_EXTRACTORS.contains(&extractor) {
            return Err(AppError::Config(format!(
                "Unknown extractor: {}. Supported: {}",
                extractor,
                KNOWN_EXTRACTORS.join(", ")
            )));
        }

        if self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "Embedding dimensions must be greater than zero".to_string(),
            ));
        }

        let threshold = self.policy.confidence_threshold;
        if !threshold.is_finite() || !(-1.0..=1.0).contains(&threshold) {
            return Err(AppError::Config(format!(
                "Confidence threshold must be within [-1, 1], got {}",
                threshold
            )));
        }

        let weights = [
            self.feedback.not_helpful_weight,
            self.feedback.too_vague_weight,
            self.feedback.good_weight,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(AppError::Config(
                "Feedback weights must be finite and non-negative".to_string(),
            ));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(AppError::Config(
                "At least one feedback weight must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
