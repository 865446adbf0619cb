use async_trait::async_trait;

use super::backend::EngagementSink;
use engagement_common::EngagementRecord;

/// Sink that discards everything.
pub struct NoopSink;

#[async_trait]
impl EngagementSink for NoopSink {
    async fn on_new_record(&self, _record: &EngagementRecord) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_empty(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
