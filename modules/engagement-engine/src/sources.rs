use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use engagement_common::config::Location;
use engagement_common::{EngagementError, Result};
use snapshot_client::{parse_registry, RegistryEntry, Snapshot, SnapshotClient};

/// Where snapshots come from. Fetching is the only suspension point of a cycle.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<Snapshot>;
}

/// Where the manager-facing post registry comes from.
#[async_trait]
pub trait RegistrySource: Send + Sync {
    async fn fetch_registry(&self) -> Result<Vec<RegistryEntry>>;
}

/// JSON documents served over HTTP.
pub struct HttpSource {
    client: Arc<SnapshotClient>,
    url: String,
}

impl HttpSource {
    pub fn new(client: Arc<SnapshotClient>, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    async fn fetch_snapshot(&self) -> Result<Snapshot> {
        self.client
            .fetch_snapshot(&self.url)
            .await
            .map_err(|e| EngagementError::Source(e.to_string()))
    }
}

#[async_trait]
impl RegistrySource for HttpSource {
    async fn fetch_registry(&self) -> Result<Vec<RegistryEntry>> {
        self.client
            .fetch_registry(&self.url)
            .await
            .map_err(|e| EngagementError::Source(e.to_string()))
    }
}

/// JSON documents on local disk, re-read on every fetch.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            EngagementError::Source(format!("{}: {e}", self.path.display()))
        })
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    async fn fetch_snapshot(&self) -> Result<Snapshot> {
        let body = self.read().await?;
        Snapshot::parse(&body).map_err(|e| EngagementError::Parse(e.to_string()))
    }
}

#[async_trait]
impl RegistrySource for FileSource {
    async fn fetch_registry(&self) -> Result<Vec<RegistryEntry>> {
        let body = self.read().await?;
        parse_registry(&body).map_err(|e| EngagementError::Parse(e.to_string()))
    }
}

pub fn snapshot_source(
    location: &Location,
    client: Arc<SnapshotClient>,
) -> Arc<dyn SnapshotSource> {
    match location {
        Location::Http(url) => Arc::new(HttpSource::new(client, url.clone())),
        Location::File(path) => Arc::new(FileSource::new(path.clone())),
    }
}

pub fn registry_source(
    location: &Location,
    client: Arc<SnapshotClient>,
) -> Arc<dyn RegistrySource> {
    match location {
        Location::Http(url) => Arc::new(HttpSource::new(client, url.clone())),
        Location::File(path) => Arc::new(FileSource::new(path.clone())),
    }
}
