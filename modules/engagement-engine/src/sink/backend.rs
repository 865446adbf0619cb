use async_trait::async_trait;

use engagement_common::EngagementRecord;

/// Receiver of reconciled engagement records (the presentation layer).
#[async_trait]
pub trait EngagementSink: Send + Sync {
    /// Called once per newly reconciled record, in emission order.
    async fn on_new_record(&self, record: &EngagementRecord) -> anyhow::Result<()>;

    /// Called when an initial load or a reload derives zero records.
    async fn on_empty(&self) -> anyhow::Result<()>;

    /// Called before a reload re-emits every record as new.
    async fn on_reset(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
