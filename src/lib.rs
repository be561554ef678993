#![deny(missing_docs)]

//! Core library for the docsum document summarization service.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Plain-text extraction from `.docx` documents.
pub mod extraction;
/// Structured logging and tracing setup.
pub mod logging;
/// Request counters.
pub mod metrics;
/// Summarize pipeline orchestration.
pub mod processing;
/// Request-scoped scratch files.
pub mod scratch;
/// Summarization backend abstraction and adapters.
pub mod summarization;
