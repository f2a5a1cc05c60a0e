//! CLI entry point: wires the input drivers, the request pipeline, and the
//! stdout/stderr sink together.

mod input;
mod sink;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use scout_engine::{
    DeliverabilityValidator, FetchSettings, PipelineHandle, PipelineSettings, ReqwestFetcher,
    TitleEmailExtractor,
};

use crate::sink::StdStreamSink;

/// Fetches every URL referenced in bracketed spans of the input and prints
/// one JSON record per reachable page.
#[derive(Parser, Debug)]
#[command(name = "scout", version, about)]
struct Cli {
    /// Input file; reads line-oriented standard input when omitted.
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _ = dotenvy::dotenv();
    let secret =
        std::env::var("IM_SECRET").context("IM_SECRET environment variable is missing")?;
    scout_logging::initialize_for_app();

    let fetcher = Arc::new(ReqwestFetcher::new(FetchSettings::default())?);
    let extractor = Arc::new(TitleEmailExtractor::new(Box::new(
        DeliverabilityValidator::default(),
    )));
    let settings = PipelineSettings {
        redaction_secret: Some(secret),
        ..PipelineSettings::default()
    };
    let pipeline = PipelineHandle::spawn(fetcher, extractor, Arc::new(StdStreamSink), settings);

    match &cli.file {
        Some(path) => input::drive_from_file(&pipeline, path).await?,
        None => input::drive_from_stdin(&pipeline).await?,
    }

    pipeline.finish_input();
    pipeline.wait().await;
    Ok(())
}
