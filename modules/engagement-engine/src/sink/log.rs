use async_trait::async_trait;
use tracing::info;

use super::backend::EngagementSink;
use engagement_common::EngagementRecord;

/// Writes each record to the tracing log.
pub struct LogSink;

#[async_trait]
impl EngagementSink for LogSink {
    async fn on_new_record(&self, record: &EngagementRecord) -> anyhow::Result<()> {
        info!(
            post_id = record.post_id.as_str(),
            user_id = record.user_id.as_str(),
            name = record.display_name.as_str(),
            reacted = record.has_reaction,
            comment = record.comment_text.as_str(),
            time = %record.display_time.format("%Y-%m-%dT%H:%M:%S"),
            category = %record.category,
            "New engagement"
        );
        Ok(())
    }

    async fn on_empty(&self) -> anyhow::Result<()> {
        info!("No engagement data in snapshot");
        Ok(())
    }

    async fn on_reset(&self) -> anyhow::Result<()> {
        info!("Engagement view reset, re-emitting from scratch");
        Ok(())
    }
}
