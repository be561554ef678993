//! Summarization backends.
//!
//! The service talks to one backend, chosen by `SUMMARIZATION_PROVIDER` and built once at
//! startup. Remote backends (Hugging Face inference endpoints, Ollama) are reached over HTTP with
//! `reqwest`; the extractive backend runs in process and exists for offline use and tests.
//! Every backend honors the same contract: text plus [`SummaryBounds`] in, one summary string
//! out, and identical output for identical input when sampling is off.

mod extractive;
mod huggingface;
mod ollama;

pub use extractive::ExtractiveSummarizer;
pub use huggingface::HuggingFaceClient;
pub use ollama::OllamaSummarizationClient;

use crate::config::{Config, SummarizationProvider};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced while generating a summary.
#[derive(Debug, Error)]
pub enum SummarizationClientError {
    /// Backend could not be reached or is not ready to serve.
    #[error("Summarization provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Backend returned an error response.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Backend response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
    /// Client construction failed.
    #[error("Failed to build summarization client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Length bounds and decoding mode for one summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryBounds {
    /// Upper bound on summary length.
    pub max_length: usize,
    /// Lower bound on summary length.
    pub min_length: usize,
    /// Sample instead of decoding deterministically.
    pub do_sample: bool,
}

impl SummaryBounds {
    /// Bounds applied to every uploaded document.
    pub const DOCUMENT: Self = Self {
        max_length: 200,
        min_length: 50,
        do_sample: false,
    };
}

impl Default for SummaryBounds {
    fn default() -> Self {
        Self::DOCUMENT
    }
}

/// Input handed to a summarization backend.
#[derive(Debug, Clone)]
pub struct SummarizationRequest {
    /// Text to summarize.
    pub text: String,
    /// Bounds applied to the generated summary.
    pub bounds: SummaryBounds,
}

/// Interface implemented by summarization backends.
#[async_trait]
pub trait SummarizationClient: Send + Sync {
    /// Produce a single summary for the request.
    async fn summarize(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError>;

    /// Short backend name for logs and health output.
    fn provider(&self) -> &'static str;
}

/// Build the summarization backend selected by configuration.
pub fn build_summarization_client(
    config: &Config,
) -> Result<Box<dyn SummarizationClient>, SummarizationClientError> {
    let client: Box<dyn SummarizationClient> = match config.summarization_provider {
        SummarizationProvider::HuggingFace => Box::new(HuggingFaceClient::new(
            http_client(config)?,
            config.summarization_url.clone(),
            config.summarization_model.clone(),
            config.summarization_api_key.clone(),
        )),
        SummarizationProvider::Ollama => Box::new(OllamaSummarizationClient::new(
            http_client(config)?,
            config.summarization_url.clone(),
            config.summarization_model.clone(),
        )),
        SummarizationProvider::Extractive => Box::new(ExtractiveSummarizer::new()),
    };
    tracing::info!(provider = client.provider(), "Summarization backend initialized");
    Ok(client)
}

fn http_client(config: &Config) -> Result<Client, SummarizationClientError> {
    Ok(Client::builder()
        .user_agent(concat!("docsum/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(config.summarization_timeout_secs))
        .build()?)
}

/// Collapse whitespace runs and trim a backend's reply.
pub(crate) fn normalize_summary(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_bounds_are_fixed() {
        let bounds = SummaryBounds::default();
        assert_eq!(bounds.max_length, 200);
        assert_eq!(bounds.min_length, 50);
        assert!(!bounds.do_sample);
    }

    #[test]
    fn factory_honors_provider_selection() {
        let mut config = Config {
            summarization_provider: SummarizationProvider::Extractive,
            ..Config::default()
        };
        assert_eq!(
            build_summarization_client(&config).unwrap().provider(),
            "extractive"
        );

        config.summarization_provider = SummarizationProvider::Ollama;
        assert_eq!(
            build_summarization_client(&config).unwrap().provider(),
            "ollama"
        );

        config.summarization_provider = SummarizationProvider::HuggingFace;
        assert_eq!(
            build_summarization_client(&config).unwrap().provider(),
            "huggingface"
        );
    }

    #[test]
    fn normalize_summary_collapses_whitespace() {
        assert_eq!(normalize_summary("  A  short\n summary. "), "A short summary.");
    }
}
