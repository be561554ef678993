//! Summary service coordinating scratch storage, extraction, and the summarization backend.

use crate::{
    config::Config,
    extraction,
    metrics::{MetricsSnapshot, SummaryMetrics},
    processing::{
        tokens::{TokenCounter, build_token_counter},
        types::{ProcessingError, SummaryOutcome},
    },
    scratch::ScratchFile,
    summarization::{
        SummarizationClient, SummarizationClientError, SummarizationRequest, SummaryBounds,
        build_summarization_client,
    },
};
use async_trait::async_trait;
use axum::body::Bytes;
use std::path::PathBuf;

/// Runs the per-request pipeline: scratch file, text extraction, input checks, summary.
///
/// The service owns the summarization backend for the whole process. Build it once at startup
/// and share it through an `Arc`; request handlers only ever borrow it.
pub struct SummaryService {
    client: Box<dyn SummarizationClient>,
    token_counter: TokenCounter,
    scratch_dir: PathBuf,
    max_input_tokens: usize,
    max_document_bytes: u64,
    metrics: SummaryMetrics,
}

/// Abstraction over the summary pipeline used by the HTTP surface.
#[async_trait]
pub trait SummaryApi: Send + Sync {
    /// Summarize an uploaded `.docx` document with the fixed document bounds.
    async fn summarize_document(&self, upload: Bytes) -> Result<SummaryOutcome, ProcessingError>;

    /// Record a request refused before it reached the pipeline.
    fn record_rejection(&self);

    /// Name of the active summarization backend.
    fn provider(&self) -> &'static str;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl SummaryService {
    /// Build the service and its backend from configuration.
    pub fn new(config: &Config) -> Result<Self, SummarizationClientError> {
        tracing::info!("Initializing summarization backend");
        let client = build_summarization_client(config)?;
        Ok(Self::with_client(
            client,
            config.scratch_dir.clone(),
            config.summarization_max_input_tokens,
        )
        .with_max_document_bytes(config.max_document_bytes))
    }

    /// Build the service around an existing backend.
    pub fn with_client(
        client: Box<dyn SummarizationClient>,
        scratch_dir: PathBuf,
        max_input_tokens: usize,
    ) -> Self {
        Self {
            client,
            token_counter: build_token_counter(),
            scratch_dir,
            max_input_tokens,
            max_document_bytes: extraction::DEFAULT_MAX_PART_BYTES,
            metrics: SummaryMetrics::new(),
        }
    }

    /// Replace the token counter, e.g. with a whitespace counter.
    pub fn with_token_counter(mut self, token_counter: TokenCounter) -> Self {
        self.token_counter = token_counter;
        self
    }

    /// Cap the decompressed size of an uploaded document body.
    pub fn with_max_document_bytes(mut self, max_document_bytes: u64) -> Self {
        self.max_document_bytes = max_document_bytes;
        self
    }

    /// Summarize arbitrary text with explicit bounds, skipping scratch storage.
    pub async fn summarize_text(
        &self,
        text: String,
        bounds: SummaryBounds,
    ) -> Result<SummaryOutcome, ProcessingError> {
        let input_tokens = self.check_input(&text)?;
        self.generate(text, input_tokens, bounds).await
    }

    async fn run_pipeline(&self, upload: Bytes) -> Result<SummaryOutcome, ProcessingError> {
        let scratch_dir = self.scratch_dir.clone();
        let max_document_bytes = self.max_document_bytes;
        let (scratch, text) = tokio::task::spawn_blocking(move || {
            let scratch = ScratchFile::create(&scratch_dir, &upload)?;
            let text = extraction::extract_text(scratch.path(), max_document_bytes)?;
            Ok::<_, ProcessingError>((scratch, text))
        })
        .await??;

        tracing::debug!(chars = text.len(), "Extracted document text");
        let input_tokens = self.check_input(&text)?;
        let outcome = self
            .generate(text, input_tokens, SummaryBounds::DOCUMENT)
            .await;
        drop(scratch);
        outcome
    }

    fn check_input(&self, text: &str) -> Result<usize, ProcessingError> {
        if text.trim().is_empty() {
            return Err(ProcessingError::EmptyDocument);
        }
        let tokens = (self.token_counter)(text);
        if tokens > self.max_input_tokens {
            return Err(ProcessingError::InputTooLarge {
                tokens,
                limit: self.max_input_tokens,
            });
        }
        Ok(tokens)
    }

    async fn generate(
        &self,
        text: String,
        input_tokens: usize,
        bounds: SummaryBounds,
    ) -> Result<SummaryOutcome, ProcessingError> {
        let input_chars = text.chars().count();
        let summary = self
            .client
            .summarize(SummarizationRequest { text, bounds })
            .await?;
        if summary.is_empty() {
            return Err(SummarizationClientError::InvalidResponse(
                "backend returned an empty summary".into(),
            )
            .into());
        }
        Ok(SummaryOutcome {
            summary,
            bounds,
            input_chars,
            input_tokens,
        })
    }
}

#[async_trait]
impl SummaryApi for SummaryService {
    async fn summarize_document(&self, upload: Bytes) -> Result<SummaryOutcome, ProcessingError> {
        tracing::info!(bytes = upload.len(), provider = self.client.provider(), "Summarizing document");
        let result = self.run_pipeline(upload).await;
        match &result {
            Ok(outcome) => {
                self.metrics.record_success();
                tracing::info!(
                    input_chars = outcome.input_chars,
                    input_tokens = outcome.input_tokens,
                    summary_chars = outcome.summary.len(),
                    "Document summarized"
                );
            }
            Err(error) if error.is_rejection() => {
                self.metrics.record_rejection();
                tracing::info!(error = %error, "Document rejected");
            }
            Err(error) => {
                self.metrics.record_failure();
                tracing::error!(error = %error, "Document summarization failed");
            }
        }
        result
    }

    fn record_rejection(&self) {
        self.metrics.record_rejection();
    }

    fn provider(&self) -> &'static str {
        self.client.provider()
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
