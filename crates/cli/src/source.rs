use anyhow::{Context as AnyhowContext, Result};
use clap::Args;
use lookout_protocol::{decode_history_document, HistorySnapshot, InvestigationRecord};
use reqwest::Client;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const HISTORY_PATH: &str = "/api/history";

/// Where the history document comes from.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// Read the history document from a file (`-` for stdin)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Fetch the history from a running backend (GET {url}/api/history)
    #[arg(long)]
    pub url: Option<String>,
}

impl SourceArgs {
    /// Load the snapshot. Retrieval or decoding failures become the
    /// unavailable snapshot instead of an error.
    pub async fn snapshot(&self) -> HistorySnapshot {
        match self.load().await {
            Ok(records) => {
                log::info!("loaded {} history records", records.len());
                HistorySnapshot::available(records)
            }
            Err(err) => {
                log::warn!("history unavailable: {err:#}");
                HistorySnapshot::unavailable(format!("{err:#}"))
            }
        }
    }

    async fn load(&self) -> Result<Vec<InvestigationRecord>> {
        let bytes = match (&self.file, &self.url) {
            (Some(path), _) => read_file(path)?,
            (None, Some(base)) => fetch(base).await?,
            (None, None) => anyhow::bail!("No history source. Provide --file or --url."),
        };
        decode_history_document(&bytes)
    }
}

fn read_file(path: &PathBuf) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .context("Failed to read history from stdin")?;
        return Ok(buffer);
    }
    fs::read(path).with_context(|| format!("Failed to read history from {}", path.display()))
}

fn history_url(base: &str) -> String {
    format!("{}{HISTORY_PATH}", base.trim_end_matches('/'))
}

async fn fetch(base: &str) -> Result<Vec<u8>> {
    let url = history_url(base);
    log::debug!("GET {url}");

    let client = Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;
    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("History request failed: GET {url}"))?
        .error_for_status()
        .with_context(|| format!("History request failed: GET {url}"))?;
    let body = response
        .bytes()
        .await
        .with_context(|| format!("Failed while reading HTTP body from {url}"))?;
    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_url_joins_base_without_double_slash() {
        assert_eq!(
            history_url("http://localhost:5000/"),
            "http://localhost:5000/api/history"
        );
        assert_eq!(
            history_url("http://localhost:5000"),
            "http://localhost:5000/api/history"
        );
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let source = SourceArgs {
            file: Some(PathBuf::from("/nonexistent/lookout/history.json")),
            url: None,
        };
        let snapshot = source.snapshot().await;
        assert!(!snapshot.is_available());
    }
}
