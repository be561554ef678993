//! Outcome and error types for the summarize pipeline.

use crate::extraction::ExtractionError;
use crate::scratch::ScratchError;
use crate::summarization::{SummarizationClientError, SummaryBounds};
use thiserror::Error;

/// Errors emitted by the summarize pipeline.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// The upload could not be written to scratch storage.
    #[error("Failed to store upload: {0}")]
    Scratch(#[from] ScratchError),
    /// The upload is not a readable `.docx` document.
    #[error("Malformed document: {0}")]
    MalformedDocument(ExtractionError),
    /// The document body decompresses past the configured ceiling.
    #[error("Document too large to summarize: body exceeds {limit} bytes once decompressed")]
    DocumentTooLarge {
        /// Ceiling on the decompressed document body, in bytes.
        limit: u64,
    },
    /// The document parsed but holds no text worth summarizing.
    #[error("Document contains no text")]
    EmptyDocument,
    /// The extracted text exceeds what the backend accepts.
    #[error("Document too large to summarize: {tokens} tokens exceeds the limit of {limit}")]
    InputTooLarge {
        /// Token count of the extracted text.
        tokens: usize,
        /// Configured input ceiling.
        limit: usize,
    },
    /// The summarization backend failed.
    #[error("Summarization backend failed: {0}")]
    Summarization(#[from] SummarizationClientError),
    /// Blocking work panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ProcessingError {
    /// True when the caller's input, not the service, caused the failure.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::EmptyDocument | Self::InputTooLarge { .. } | Self::DocumentTooLarge { .. }
        )
    }
}

impl From<ExtractionError> for ProcessingError {
    fn from(error: ExtractionError) -> Self {
        match error {
            ExtractionError::TooLarge { limit } => Self::DocumentTooLarge { limit },
            other => Self::MalformedDocument(other),
        }
    }
}

/// Result of summarizing one uploaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOutcome {
    /// Summary text returned by the backend.
    pub summary: String,
    /// Bounds the summary was generated with.
    pub bounds: SummaryBounds,
    /// Character count of the extracted text.
    pub input_chars: usize,
    /// Token count of the extracted text.
    pub input_tokens: usize,
}
