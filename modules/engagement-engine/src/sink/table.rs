use async_trait::async_trait;
use tokio::sync::RwLock;

use super::backend::EngagementSink;
use engagement_common::EngagementRecord;

/// In-memory copy of everything displayed so far.
///
/// Export collaborators read the whole table through `rows()`. A reload
/// clears it before the records are re-emitted.
#[derive(Default)]
pub struct TableSink {
    inner: RwLock<TableState>,
}

#[derive(Default)]
struct TableState {
    rows: Vec<EngagementRecord>,
    empty_signals: u64,
    resets: u64,
}

impl TableSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn rows(&self) -> Vec<EngagementRecord> {
        self.inner.read().await.rows.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.rows.is_empty()
    }

    /// How many times the engine reported an empty load.
    pub async fn empty_signals(&self) -> u64 {
        self.inner.read().await.empty_signals
    }

    pub async fn resets(&self) -> u64 {
        self.inner.read().await.resets
    }
}

#[async_trait]
impl EngagementSink for TableSink {
    async fn on_new_record(&self, record: &EngagementRecord) -> anyhow::Result<()> {
        self.inner.write().await.rows.push(record.clone());
        Ok(())
    }

    async fn on_empty(&self) -> anyhow::Result<()> {
        self.inner.write().await.empty_signals += 1;
        Ok(())
    }

    async fn on_reset(&self) -> anyhow::Result<()> {
        let mut state = self.inner.write().await;
        state.rows.clear();
        state.resets += 1;
        Ok(())
    }
}
