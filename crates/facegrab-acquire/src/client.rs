use crate::config::AcquireConfig;
use anyhow::{Context, Result};
use bytes::Bytes;

/// Shared HTTP client for one run. Clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &AcquireConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let inner = builder.build().context("Failed to build HTTP client")?;
        Ok(Self { inner })
    }

    /// Fetch a page as text.
    ///
    /// Failures are logged here and reported as `None`; callers skip the
    /// page instead of propagating.
    pub async fn fetch_text(&self, url: &str) -> Option<String> {
        match self.try_fetch_text(url).await {
            Ok(body) => {
                tracing::debug!(url = %url, bytes = body.len(), "Received HTML");
                Some(body)
            }
            Err(e) => {
                tracing::error!(url = %url, "Failed to fetch {url}: {e:#}");
                None
            }
        }
    }

    async fn try_fetch_text(&self, url: &str) -> Result<String> {
        let response = self.get(url).await?;
        response.text().await.context("Failed to read response body")
    }

    /// Fetch raw bytes for a download. The caller decides how to log failures.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Bytes> {
        let response = self.get(url).await?;
        response.bytes().await.context("Failed to read response body")
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let response = self
            .inner
            .get(url)
            .send()
            .await
            .context("Request failed")?;

        let status = response.status();
        anyhow::ensure!(status.is_success(), "HTTP {status} for {url}");
        Ok(response)
    }
}
