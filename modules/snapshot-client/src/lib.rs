pub mod error;
pub mod types;

pub use error::{Result, SnapshotClientError};
pub use types::{parse_registry, RawComment, RawPost, RawReaction, RegistryEntry, Snapshot};

use std::time::Duration;

/// Requests that take longer than this are abandoned so a stuck endpoint
/// cannot hold the poll cycle forever.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct SnapshotClient {
    client: reqwest::Client,
    token: Option<String>,
}

impl SnapshotClient {
    pub fn new(token: Option<String>) -> Self {
        Self::with_timeout(token, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(token: Option<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self { client, token }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GET a URL and return the body of a successful response.
    async fn get_text(&self, url: &str) -> Result<String> {
        let resp = self.authorize(self.client.get(url)).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SnapshotClientError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.text().await?)
    }

    /// Fetch and parse one engagement snapshot.
    pub async fn fetch_snapshot(&self, url: &str) -> Result<Snapshot> {
        let body = self.get_text(url).await?;
        let snapshot = Snapshot::parse(&body)?;
        tracing::debug!(
            url,
            groups = snapshot.results_by_group.len(),
            "Fetched snapshot"
        );
        Ok(snapshot)
    }

    /// Fetch the post registry. Entries that are not JSON objects are dropped.
    pub async fn fetch_registry(&self, url: &str) -> Result<Vec<RegistryEntry>> {
        let body = self.get_text(url).await?;
        let entries = parse_registry(&body)?;
        tracing::info!(url, count = entries.len(), "Fetched post registry");
        Ok(entries)
    }

    /// Ask the backend to start collecting engagement. The response body is ignored.
    pub async fn trigger(&self, url: &str) -> Result<()> {
        let resp = self.authorize(self.client.post(url)).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SnapshotClientError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        tracing::info!(url, "Backend processing triggered");
        Ok(())
    }
}
