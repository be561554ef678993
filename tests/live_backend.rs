use std::{env, sync::Once};

use docsum::{
    config,
    processing::SummaryService,
    summarization::{SummarizationRequest, SummaryBounds, build_summarization_client},
};

static INIT: Once = Once::new();

fn set_default_env(key: &str, value: &str) {
    let needs_value = env::var(key).map(|v| v.trim().is_empty()).unwrap_or(true);
    if needs_value {
        // SAFETY: Tests run serially via Once and we intentionally mutate process env.
        unsafe {
            env::set_var(key, value);
        }
    }
}

fn init_config_once() {
    INIT.call_once(|| {
        set_default_env("SUMMARIZATION_PROVIDER", "ollama");
        set_default_env("SUMMARIZATION_URL", "http://127.0.0.1:11434");
        config::init_config();
    });
}

const ARTICLE: &str = "The city council approved a new transit plan on Tuesday after months of \
    debate. The plan adds three bus lines, extends light rail service to the airport, and \
    raises parking fees downtown to fund maintenance. Supporters said the changes would cut \
    commute times and emissions, while opponents worried about the cost to small businesses. \
    Construction on the rail extension is expected to begin next spring and finish within \
    four years. The council will review ridership figures annually and may adjust fares.";

#[tokio::test]
#[ignore = "Requires a live summarization backend"]
async fn live_backend_summary_is_deterministic() {
    init_config_once();
    let client = build_summarization_client(config::get_config())
        .expect("failed to build summarization client");
    let request = SummarizationRequest {
        text: ARTICLE.to_string(),
        bounds: SummaryBounds::DOCUMENT,
    };

    let first = client
        .summarize(request.clone())
        .await
        .expect("failed to request summary from provider");
    let second = client
        .summarize(request)
        .await
        .expect("failed to request summary from provider");

    assert!(!first.is_empty(), "summary should not be empty");
    assert_eq!(first, second, "deterministic decoding should repeat");
}

#[tokio::test]
#[ignore = "Requires a live summarization backend"]
async fn live_service_summarizes_text() {
    init_config_once();
    let service = SummaryService::new(config::get_config()).expect("service");
    let outcome = service
        .summarize_text(ARTICLE.to_string(), SummaryBounds::DOCUMENT)
        .await
        .expect("summary");
    assert!(outcome.input_tokens > 0);
    assert!(!outcome.summary.is_empty());
}
