use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::warn;

use snapshot_client::SnapshotClient;

/// Asks the backend to start collecting engagement.
#[async_trait]
pub trait BackendTrigger: Send + Sync {
    async fn trigger(&self) -> anyhow::Result<()>;
}

pub struct HttpBackendTrigger {
    client: Arc<SnapshotClient>,
    url: String,
}

impl HttpBackendTrigger {
    pub fn new(client: Arc<SnapshotClient>, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl BackendTrigger for HttpBackendTrigger {
    async fn trigger(&self) -> anyhow::Result<()> {
        self.client.trigger(&self.url).await?;
        Ok(())
    }
}

/// Run the trigger in the background. Failure is logged and otherwise ignored;
/// nothing waits on the returned handle in normal operation.
pub fn fire_and_forget(trigger: Arc<dyn BackendTrigger>) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = trigger.trigger().await {
            warn!(error = %e, "Backend trigger failed");
        }
    })
}
