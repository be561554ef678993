//! Summarize pipeline: scratch storage, extraction, input checks, and the backend call.

mod service;
pub mod tokens;
pub mod types;

pub use service::{SummaryApi, SummaryService};
pub use types::{ProcessingError, SummaryOutcome};
