use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use scout_core::extract_urls;
use scout_engine::PipelineHandle;

/// Reads the whole file, then submits every extracted URL.
pub async fn drive_from_file(pipeline: &PipelineHandle, path: &Path) -> Result<()> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("error reading file {}", path.display()))?;
    for url in extract_urls(&text) {
        pipeline.submit(url);
    }
    Ok(())
}

/// Parses each stdin line independently, submitting its URLs as the line
/// arrives; fetching overlaps with reading.
pub async fn drive_from_stdin(pipeline: &PipelineHandle) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("error reading stdin")? {
        for url in extract_urls(&line) {
            pipeline.submit(url);
        }
    }
    Ok(())
}
