//! Ollama-backed summarization over `/api/generate`.

use super::{SummarizationClient, SummarizationClientError, SummarizationRequest, SummaryBounds};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";
/// Seed pinned for deterministic decoding.
const DETERMINISTIC_SEED: u64 = 42;
const SAMPLING_TEMPERATURE: f32 = 0.8;

/// Client for a local Ollama runtime.
pub struct OllamaSummarizationClient {
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaSummarizationClient {
    /// Create a client; `None` overrides fall back to a local runtime and a default model.
    pub fn new(http: Client, base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    done: bool,
}

fn build_prompt(text: &str, bounds: &SummaryBounds) -> String {
    format!(
        "System: You summarize documents into a single factual paragraph. Avoid speculation. \
         Write between {min} and {max} tokens. Return only the summary.\n\n\
         Document:\n{text}\n",
        min = bounds.min_length,
        max = bounds.max_length,
    )
}

#[async_trait]
impl SummarizationClient for OllamaSummarizationClient {
    async fn summarize(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError> {
        let bounds = request.bounds;
        let options = if bounds.do_sample {
            json!({
                "temperature": SAMPLING_TEMPERATURE,
                "num_predict": bounds.max_length,
            })
        } else {
            json!({
                "temperature": 0.0,
                "seed": DETERMINISTIC_SEED,
                "num_predict": bounds.max_length,
            })
        };
        let payload = json!({
            "model": self.model,
            "prompt": build_prompt(&request.text, &bounds),
            "stream": false,
            "options": options,
        });

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SummarizationClientError::ProviderUnavailable(format!(
                "Ollama endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::GenerationFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: OllamaResponse = response.json().await.map_err(|error| {
            SummarizationClientError::InvalidResponse(format!(
                "failed to decode Ollama response: {error}"
            ))
        })?;

        if !body.done {
            return Err(SummarizationClientError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        Ok(super::normalize_summary(&body.response))
    }

    fn provider(&self) -> &'static str {
        "ollama"
    }
}
