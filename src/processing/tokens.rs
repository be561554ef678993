//! Token counting for the backend input guard.
//!
//! BART-family summarization models use the GPT-2 byte-level BPE, which `tiktoken-rs` ships as
//! `r50k_base`. When the encoding cannot be loaded the counter falls back to whitespace words.

use std::sync::Arc;
use tiktoken_rs::r50k_base;

/// Shared token counting function.
pub type TokenCounter = Arc<dyn Fn(&str) -> usize + Send + Sync>;

/// Build the token counter used for input-size checks.
pub fn build_token_counter() -> TokenCounter {
    match r50k_base() {
        Ok(encoding) => {
            let encoding = Arc::new(encoding);
            Arc::new(move |text: &str| encoding.encode_ordinary(text).len())
        }
        Err(error) => {
            tracing::warn!(
                error = %error,
                "Tokenizer unavailable; falling back to whitespace counter"
            );
            whitespace_counter()
        }
    }
}

/// Count whitespace-separated words.
pub fn whitespace_counter() -> TokenCounter {
    Arc::new(|text: &str| text.split_whitespace().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bpe_counter_counts_subword_tokens() {
        let counter = build_token_counter();
        assert_eq!(counter(""), 0);
        let words = "summarization pipelines tokenize text";
        assert!(counter(words) >= words.split_whitespace().count());
    }

    #[test]
    fn whitespace_counter_counts_words() {
        let counter = whitespace_counter();
        assert_eq!(counter("  one two\tthree\n"), 3);
    }
}
