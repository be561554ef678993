//! Summarize a local `.docx` file from the command line.
//!
//! Uses the same configuration and backend as the HTTP server, which makes it handy for checking
//! a backend setup without going through multipart uploads.
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use docsum::{
    config, extraction, logging,
    processing::SummaryService,
    summarization::SummaryBounds,
};

#[derive(Parser)]
#[command(name = "docsum-file", about = "Summarize a local .docx document")]
struct Cli {
    /// Path to the `.docx` document.
    path: PathBuf,
    /// Upper bound on summary length.
    #[arg(long, default_value_t = SummaryBounds::DOCUMENT.max_length)]
    max_length: usize,
    /// Lower bound on summary length.
    #[arg(long, default_value_t = SummaryBounds::DOCUMENT.min_length)]
    min_length: usize,
    /// Sample instead of decoding deterministically.
    #[arg(long)]
    sample: bool,
    /// Print the extracted text and skip summarization.
    #[arg(long)]
    extract_only: bool,
    /// Ceiling on the decompressed document body, in bytes.
    #[arg(long, default_value_t = extraction::DEFAULT_MAX_PART_BYTES)]
    max_document_bytes: u64,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_cli_tracing();

    if cli.min_length > cli.max_length {
        bail!(
            "--min-length ({}) must not exceed --max-length ({})",
            cli.min_length,
            cli.max_length
        );
    }

    let path = cli.path.clone();
    let max_document_bytes = cli.max_document_bytes;
    let text =
        tokio::task::spawn_blocking(move || extraction::extract_text(&path, max_document_bytes))
            .await
            .context("extraction task failed")?
            .with_context(|| format!("failed to extract text from {}", cli.path.display()))?;

    if cli.extract_only {
        println!("{text}");
        return Ok(());
    }

    config::init_config();
    let service = SummaryService::new(config::get_config())
        .context("failed to initialize summarization backend")?;
    let outcome = service
        .summarize_text(
            text,
            SummaryBounds {
                max_length: cli.max_length,
                min_length: cli.min_length,
                do_sample: cli.sample,
            },
        )
        .await
        .context("summarization failed")?;

    println!("{}", outcome.summary);
    Ok(())
}
