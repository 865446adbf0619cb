use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use super::backend::EngagementSink;
use engagement_common::EngagementRecord;

/// Posts each event as JSON to an HTTP endpoint owned by the presentation layer.
pub struct WebhookSink {
    webhook_url: String,
    http: reqwest::Client,
}

impl WebhookSink {
    pub fn new(webhook_url: String) -> Self {
        Self {
            webhook_url,
            http: reqwest::Client::new(),
        }
    }

    async fn post(&self, payload: serde_json::Value) -> anyhow::Result<()> {
        let resp = self
            .http
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Sink webhook returned non-success");
            anyhow::bail!("Sink webhook returned {status}");
        }

        Ok(())
    }
}

#[async_trait]
impl EngagementSink for WebhookSink {
    async fn on_new_record(&self, record: &EngagementRecord) -> anyhow::Result<()> {
        self.post(json!({
            "event": "record",
            "record": record,
        }))
        .await
    }

    async fn on_empty(&self) -> anyhow::Result<()> {
        self.post(json!({ "event": "empty" })).await
    }

    async fn on_reset(&self) -> anyhow::Result<()> {
        self.post(json!({ "event": "reset" })).await
    }
}
