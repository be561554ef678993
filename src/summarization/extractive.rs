//! Deterministic in-process summarizer.
//!
//! Picks leading sentences in document order until the word budget is spent. Bounds are read as
//! word counts. The sampling flag is ignored; output is always a pure function of the input.

use super::{SummarizationClient, SummarizationClientError, SummarizationRequest, SummaryBounds};
use async_trait::async_trait;

/// Lead-sentence extractive summarizer.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtractiveSummarizer;

impl ExtractiveSummarizer {
    /// Construct the summarizer.
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SummarizationClient for ExtractiveSummarizer {
    async fn summarize(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError> {
        if request.bounds.do_sample {
            tracing::debug!("Extractive summarizer ignores sampling");
        }
        Ok(build_extractive_summary(&request.text, &request.bounds))
    }

    fn provider(&self) -> &'static str {
        "extractive"
    }
}

/// Build a lead summary holding at most `max_length` words.
///
/// Whole sentences are taken while they fit. When the summary is still shorter than
/// `min_length`, the next sentence is cut at the word budget instead of being dropped.
pub(crate) fn build_extractive_summary(text: &str, bounds: &SummaryBounds) -> String {
    let max_words = bounds.max_length.max(1);
    let mut words: Vec<&str> = Vec::new();

    for sentence in split_sentences(text) {
        let sentence_words: Vec<&str> = sentence.split_whitespace().collect();
        if sentence_words.is_empty() {
            continue;
        }
        if words.len() + sentence_words.len() <= max_words {
            words.extend(sentence_words);
            if words.len() == max_words {
                break;
            }
            continue;
        }
        if words.len() < bounds.min_length || words.is_empty() {
            let room = max_words - words.len();
            words.extend(sentence_words.into_iter().take(room));
        }
        break;
    }

    words.join(" ")
}

/// Split text after `.`, `!` or `?` when followed by whitespace or the end of input.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        if matches!(ch, '.' | '!' | '?') {
            let end = index + ch.len_utf8();
            let at_boundary = chars.peek().is_none_or(|(_, next)| next.is_whitespace());
            if at_boundary {
                sentences.push(&text[start..end]);
                start = end;
            }
        }
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
}
