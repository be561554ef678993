//! HTTP surface for docsum.
//!
//! This module exposes a compact Axum router:
//!
//! - `POST /summarize` – Accept a multipart upload with a `.docx` in the `file` field, extract its
//!   text, and return `{"summary": "..."}`. A request without a `file` field gets
//!   `400 {"error": "No file provided"}`.
//! - `GET /health` – Liveness probe naming the active summarization backend.
//! - `GET /metrics` – Request counters (summarized, rejected, failed).
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.
//!
//! Every error response carries a JSON body of the form `{"error": "<message>"}`.

use crate::metrics::MetricsSnapshot;
use crate::processing::{ProcessingError, SummaryApi};
use crate::summarization::SummarizationClientError;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Multipart field carrying the uploaded document.
pub const FILE_FIELD: &str = "file";

/// Build the HTTP router exposing the summarize API surface.
pub fn create_router<S>(service: Arc<S>, max_upload_bytes: usize) -> Router
where
    S: SummaryApi + 'static,
{
    Router::new()
        .route("/summarize", post(summarize_document::<S>))
        .route("/health", get(health::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(service)
}

/// Success response for `POST /summarize`.
#[derive(Serialize)]
struct SummaryResponse {
    summary: String,
}

/// Summarize an uploaded `.docx` document.
///
/// Fields other than `file` are skipped. The upload is handed to the pipeline, which stores it
/// in a scratch file for the duration of the request.
async fn summarize_document<S>(
    State(service): State<Arc<S>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SummaryResponse>, AppError>
where
    S: SummaryApi,
{
    let span = tracing::info_span!("summarize", request_id = %Uuid::new_v4());
    async move {
        let upload = match multipart {
            Ok(mut multipart) => read_file_field(&mut multipart).await.inspect_err(|_| {
                service.record_rejection();
            })?,
            Err(rejection) => {
                tracing::debug!(reason = %rejection.body_text(), "Request is not multipart");
                None
            }
        };
        let Some(upload) = upload else {
            service.record_rejection();
            tracing::info!("Request has no file field");
            return Err(AppError::MissingFile);
        };

        let outcome = service.summarize_document(upload).await?;
        Ok(Json(SummaryResponse {
            summary: outcome.summary,
        }))
    }
    .instrument(span)
    .await
}

async fn read_file_field(multipart: &mut Multipart) -> Result<Option<Bytes>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            tracing::debug!(field = ?field.name(), "Skipping multipart field");
            continue;
        }
        tracing::debug!(
            file_name = ?field.file_name(),
            content_type = ?field.content_type(),
            "Reading uploaded file"
        );
        return Ok(Some(field.bytes().await?));
    }
    Ok(None)
}

/// Response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    provider: &'static str,
}

async fn health<S>(State(service): State<Arc<S>>) -> Json<HealthResponse>
where
    S: SummaryApi,
{
    Json(HealthResponse {
        status: "ok",
        provider: service.provider(),
    })
}

/// Return the request counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: SummaryApi,
{
    Json(service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "summarize",
                method: "POST",
                path: "/summarize",
                description: "Summarize a .docx document sent as multipart field 'file'. Response returns { \"summary\": string }.",
                request_example: Some(json!({
                    "content_type": "multipart/form-data",
                    "fields": { "file": "report.docx" }
                })),
            },
            CommandDescriptor {
                name: "health",
                method: "GET",
                path: "/health",
                description: "Report liveness and the active summarization backend.",
                request_example: None,
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return request counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

enum AppError {
    MissingFile,
    Multipart(MultipartError),
    Processing(ProcessingError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingFile => StatusCode::BAD_REQUEST,
            Self::Multipart(error) => error.status(),
            Self::Processing(error) => match error {
                ProcessingError::EmptyDocument => StatusCode::UNPROCESSABLE_ENTITY,
                ProcessingError::InputTooLarge { .. } | ProcessingError::DocumentTooLarge { .. } => {
                    StatusCode::PAYLOAD_TOO_LARGE
                }
                ProcessingError::Summarization(SummarizationClientError::ProviderUnavailable(_)) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                ProcessingError::Summarization(_) => StatusCode::BAD_GATEWAY,
                ProcessingError::MalformedDocument(_)
                | ProcessingError::Scratch(_)
                | ProcessingError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            Self::MissingFile => "No file provided".to_string(),
            Self::Multipart(error) => error.body_text(),
            Self::Processing(error) => error.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

impl From<ProcessingError> for AppError {
    fn from(inner: ProcessingError) -> Self {
        Self::Processing(inner)
    }
}

impl From<MultipartError> for AppError {
    fn from(inner: MultipartError) -> Self {
        Self::Multipart(inner)
    }
}
