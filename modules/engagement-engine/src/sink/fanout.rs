use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::backend::EngagementSink;
use engagement_common::EngagementRecord;

/// Forwards every call to each inner sink in turn.
/// A failing sink is logged and does not stop delivery to the others.
pub struct FanoutSink {
    sinks: Vec<Arc<dyn EngagementSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn EngagementSink>>) -> Self {
        Self { sinks }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl EngagementSink for FanoutSink {
    async fn on_new_record(&self, record: &EngagementRecord) -> anyhow::Result<()> {
        for sink in &self.sinks {
            if let Err(e) = sink.on_new_record(record).await {
                warn!(
                    error = %e,
                    post_id = record.post_id.as_str(),
                    "Sink failed to accept record"
                );
            }
        }
        Ok(())
    }

    async fn on_empty(&self) -> anyhow::Result<()> {
        for sink in &self.sinks {
            if let Err(e) = sink.on_empty().await {
                warn!(error = %e, "Sink failed to accept empty signal");
            }
        }
        Ok(())
    }

    async fn on_reset(&self) -> anyhow::Result<()> {
        for sink in &self.sinks {
            if let Err(e) = sink.on_reset().await {
                warn!(error = %e, "Sink failed to reset");
            }
        }
        Ok(())
    }
}
