//! Hugging Face inference endpoint serving a `summarization` pipeline.

use super::{SummarizationClient, SummarizationClientError, SummarizationRequest};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

const DEFAULT_HF_URL: &str = "https://api-inference.huggingface.co";
const DEFAULT_HF_MODEL: &str = "sshleifer/distilbart-cnn-12-6";

/// Client for `POST {base}/models/{model}` summarization endpoints.
pub struct HuggingFaceClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl HuggingFaceClient {
    /// Create a client; `None` overrides fall back to the public inference API and the default
    /// summarization model.
    pub fn new(
        http: Client,
        base_url: Option<String>,
        model: Option<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.unwrap_or_else(|| DEFAULT_HF_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_HF_MODEL.to_string()),
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Deserialize)]
struct SummaryOutput {
    summary_text: String,
}

/// Pipelines reply with a list; some custom handlers return the bare object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SummaryReply {
    Batch(Vec<SummaryOutput>),
    Single(SummaryOutput),
}

#[async_trait]
impl SummarizationClient for HuggingFaceClient {
    async fn summarize(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError> {
        let payload = json!({
            "inputs": request.text,
            "parameters": {
                "max_length": request.bounds.max_length,
                "min_length": request.bounds.min_length,
                "do_sample": request.bounds.do_sample,
            },
            "options": {
                "wait_for_model": true,
            }
        });

        let mut builder = self.http.post(self.endpoint()).json(&payload);
        if let Some(key) = self.api_key.as_deref() {
            builder = builder.bearer_auth(key);
        }

        tracing::debug!(model = %self.model, chars = request.text.len(), "Requesting summary");
        let response = builder.send().await.map_err(|error| {
            SummarizationClientError::ProviderUnavailable(format!(
                "failed to reach inference endpoint at {}: {error}",
                self.base_url
            ))
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::SERVICE_UNAVAILABLE {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::ProviderUnavailable(format!(
                "inference endpoint {} returned {status}: {body}",
                self.endpoint()
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::GenerationFailed(format!(
                "inference endpoint returned {status}: {body}"
            )));
        }

        let reply: SummaryReply = response.json().await.map_err(|error| {
            SummarizationClientError::InvalidResponse(format!(
                "failed to decode inference response: {error}"
            ))
        })?;

        let output = match reply {
            SummaryReply::Batch(outputs) => outputs.into_iter().next().ok_or_else(|| {
                SummarizationClientError::InvalidResponse("empty summary list".into())
            })?,
            SummaryReply::Single(output) => output,
        };

        Ok(super::normalize_summary(&output.summary_text))
    }

    fn provider(&self) -> &'static str {
        "huggingface"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarization::SummaryBounds;
    use httpmock::{Method::POST, MockServer};

    fn client_for(server: &MockServer, api_key: Option<&str>) -> HuggingFaceClient {
        HuggingFaceClient::new(
            Client::builder()
                .user_agent("docsum-test")
                .build()
                .expect("client"),
            Some(server.base_url()),
            Some("facebook/bart-large-cnn".into()),
            api_key.map(str::to_string),
        )
    }

    fn request() -> SummarizationRequest {
        SummarizationRequest {
            text: "A long document body.".into(),
            bounds: SummaryBounds::DOCUMENT,
        }
    }

    #[tokio::test]
    async fn sends_pipeline_parameters_and_reads_first_summary() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/models/facebook/bart-large-cnn")
                    .header("authorization", "Bearer hf_test")
                    .json_body_partial(
                        r#"{"inputs":"A long document body.","parameters":{"max_length":200,"min_length":50,"do_sample":false}}"#,
                    );
                then.status(200)
                    .json_body(json!([{ "summary_text": " The document  is long. " }]));
            })
            .await;

        let summary = client_for(&server, Some("hf_test"))
            .summarize(request())
            .await
            .expect("summary");

        mock.assert_async().await;
        assert_eq!(summary, "The document is long.");
    }

    #[tokio::test]
    async fn accepts_single_object_replies() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/models/facebook/bart-large-cnn");
                then.status(200)
                    .json_body(json!({ "summary_text": "Short." }));
            })
            .await;

        let summary = client_for(&server, None).summarize(request()).await.unwrap();
        assert_eq!(summary, "Short.");
    }

    #[tokio::test]
    async fn loading_model_is_reported_as_unavailable() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/models/facebook/bart-large-cnn");
                then.status(503)
                    .json_body(json!({ "error": "Model is currently loading", "estimated_time": 20.0 }));
            })
            .await;

        let error = client_for(&server, None)
            .summarize(request())
            .await
            .expect_err("unavailable");
        assert!(matches!(error, SummarizationClientError::ProviderUnavailable(_)));
    }

    #[tokio::test]
    async fn server_errors_surface_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/models/facebook/bart-large-cnn");
                then.status(500).body("CUDA out of memory");
            })
            .await;

        let error = client_for(&server, None)
            .summarize(request())
            .await
            .expect_err("error response");
        assert!(
            matches!(&error, SummarizationClientError::GenerationFailed(message) if message.contains("500")),
            "{error:?}"
        );
    }

    #[tokio::test]
    async fn empty_list_is_invalid() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/models/facebook/bart-large-cnn");
                then.status(200).json_body(json!([]));
            })
            .await;

        let error = client_for(&server, None)
            .summarize(request())
            .await
            .expect_err("invalid");
        assert!(matches!(error, SummarizationClientError::InvalidResponse(_)));
    }
}
