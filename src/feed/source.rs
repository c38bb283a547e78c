use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::data::{parse_records, ParsedSnapshot};

/// Where a snapshot comes from. One load per view instance; no retries.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    fn describe(&self) -> String;
    async fn load(&self) -> Result<ParsedSnapshot>;
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<ParsedSnapshot> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        parse_records(&bytes)
    }
}

pub struct HttpSource {
    client: Client,
    url: Url,
}

impl HttpSource {
    pub fn new(url: Url, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs.max(1)))
                .build()
                .unwrap_or_else(|_| Client::new()),
            url,
        }
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn load(&self) -> Result<ParsedSnapshot> {
        let resp = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.url))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("GET {} returned {}", self.url, status));
        }
        let bytes = resp.bytes().await.context("failed to read response body")?;
        parse_records(&bytes)
    }
}

/// `http(s)://` locations load over HTTP, `file://` URLs and bare paths
/// from disk.
pub fn source_for(location: &str, timeout_secs: u64) -> Result<Box<dyn SnapshotSource>> {
    match Url::parse(location) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
            Ok(Box::new(HttpSource::new(url, timeout_secs)))
        }
        Ok(url) if url.scheme() == "file" => {
            let path = url
                .to_file_path()
                .map_err(|_| anyhow!("invalid file URL: {}", location))?;
            Ok(Box::new(FileSource::new(path)))
        }
        // Windows drive letters parse as a one-letter scheme
        Ok(url) if url.scheme().len() > 1 => Err(anyhow!("unsupported scheme: {}", url.scheme())),
        _ => Ok(Box::new(FileSource::new(location))),
    }
}
