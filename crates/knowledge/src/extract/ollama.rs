//! Extractive question answering through a local Ollama model.

use crate::extract::AnswerExtractor;
use faqbot_core::{AppError, AppResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GENERATE_ENDPOINT: &str = "/api/generate";

/// Sampling temperature; extraction should copy, not create.
const TEMPERATURE: f32 = 0.1;

/// Upper bound on generated tokens for one answer span.
const MAX_ANSWER_TOKENS: u32 = 128;

const SYSTEM_PROMPT: &str = "You are an extractive question answering model for a customer support desk.\n\
    Instructions:\n\
    - Answer with the shortest span copied verbatim from the context that answers the question\n\
    - Do not add explanations, greetings or any text that is not in the context\n\
    - If the context does not answer the question, reply with the single most relevant sentence of the context";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    system: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    done: bool,
}

/// Extractor backed by Ollama's `/api/generate`.
#[derive(Debug, Clone)]
pub struct OllamaExtractor {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaExtractor {
    pub fn new(base_url: &str, model: &str, timeout_secs: Option<u64>) -> AppResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Llm(format!("Failed to create HTTP client for Ollama: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    fn build_request(&self, question: &str, context: &str) -> GenerateRequest<'_> {
        GenerateRequest {
            model: &self.model,
            prompt: format!("Context:\n{}\n\nQuestion:\n{}\n\nAnswer:", context, question),
            system: SYSTEM_PROMPT,
            stream: false,
            options: GenerateOptions {
                temperature: TEMPERATURE,
                num_predict: MAX_ANSWER_TOKENS,
            },
        }
    }
}

#[async_trait::async_trait]
impl AnswerExtractor for OllamaExtractor {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn extract(&self, question: &str, context: &str) -> AppResult<String> {
        if context.trim().is_empty() {
            return Err(AppError::Extraction("Context is empty".to_string()));
        }

        let url = format!("{}{}", self.base_url, GENERATE_ENDPOINT);
        tracing::debug!("Sending extraction request to {} (model: {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .json(&self.build_request(question, context))
            .send()
            .await
            .map_err(|e| AppError::Extraction(format!("Failed to send request to Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Extraction(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::Extraction(format!("Failed to parse Ollama response: {}", e)))?;

        if !body.done {
            tracing::warn!("Ollama reported an incomplete generation");
        }

        let answer = body.response.trim();
        if answer.is_empty() {
            return Err(AppError::Extraction("Model returned an empty answer".to_string()));
        }

        Ok(answer.to_string())
    }
}
