#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, Response, StatusCode},
};
use docsum::{
    api,
    metrics::MetricsSnapshot,
    processing::{SummaryApi, SummaryService},
    summarization::{ExtractiveSummarizer, SummarizationClient},
};
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use zip::{ZipWriter, write::SimpleFileOptions};

pub const BOUNDARY: &str = "docsum-integration-boundary";
pub const MAX_UPLOAD_BYTES: usize = 4 * 1024 * 1024;

/// Router plus the scratch directory its requests write into.
pub struct TestApp {
    pub router: Router,
    pub service: Arc<SummaryService>,
    pub scratch: TempDir,
}

impl TestApp {
    pub fn extractive() -> Self {
        Self::with_client(Box::new(ExtractiveSummarizer::new()))
    }

    pub fn with_client(client: Box<dyn SummarizationClient>) -> Self {
        Self::build(client, |service| service)
    }

    /// Build around a service customized by `configure`.
    pub fn build(
        client: Box<dyn SummarizationClient>,
        configure: impl FnOnce(SummaryService) -> SummaryService,
    ) -> Self {
        let scratch = tempfile::tempdir().expect("scratch dir");
        let service = Arc::new(configure(SummaryService::with_client(
            client,
            scratch.path().to_path_buf(),
            4096,
        )));
        let router = api::create_router(service.clone(), MAX_UPLOAD_BYTES);
        Self {
            router,
            service,
            scratch,
        }
    }

    pub async fn post_file(&self, field: &str, bytes: &[u8]) -> (StatusCode, serde_json::Value) {
        post_file(self.router.clone(), field, bytes).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        send(self.router.clone(), request).await
    }

    pub fn service_metrics(&self) -> MetricsSnapshot {
        self.service.metrics_snapshot()
    }

    pub fn scratch_is_empty(&self) -> bool {
        scratch_entries(self.scratch.path()) == 0
    }
}

/// Post `bytes` as multipart field `field` to `/summarize`.
pub async fn post_file(
    router: Router,
    field: &str,
    bytes: &[u8],
) -> (StatusCode, serde_json::Value) {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"upload.docx\"\r\nContent-Type: application/vnd.openxmlformats-officedocument.wordprocessingml.document\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/summarize")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request");
    send(router, request).await
}

pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.oneshot(request).await.expect("router response");
    split_json(response).await
}

pub async fn split_json(response: Response<Body>) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&bytes).expect("json body");
    (status, json)
}

pub fn scratch_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).expect("read scratch dir").count()
}

/// Build a minimal `.docx` whose body holds one run per paragraph.
pub fn docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|text| format!(r#"<w:p><w:r><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#))
        .collect();
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}<w:sectPr/></w:body></w:document>"#
    );

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("[Content_Types].xml", SimpleFileOptions::default())
        .expect("content types entry");
    writer
        .write_all(br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#)
        .expect("content types body");
    writer
        .start_file("word/document.xml", SimpleFileOptions::default())
        .expect("document entry");
    writer
        .write_all(document.as_bytes())
        .expect("document body");
    writer.finish().expect("finish archive").into_inner()
}

/// A multi-paragraph report long enough to need summarizing.
pub fn long_report() -> Vec<u8> {
    let sentences = [
        "The quarterly review covered revenue, hiring, and infrastructure spending across all regions. ",
        "Revenue grew eleven percent compared with the previous quarter, driven by enterprise renewals. ",
        "Hiring slowed in the second month while the team focused on onboarding recent arrivals. ",
        "Infrastructure costs fell after the migration to the new storage tier completed in March. ",
        "Customer support response times improved, although weekend coverage remains thin. ",
        "The board asked for a detailed plan covering the expansion into two additional markets. ",
    ];
    let paragraphs: Vec<&str> = sentences.iter().copied().cycle().take(48).collect();
    docx(&paragraphs)
}
