use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use engagement_common::{Category, Config};
use engagement_engine::{
    sink::{EngagementSink, FanoutSink, LogSink, TableSink, WebhookSink},
    sources::{registry_source, snapshot_source},
    trigger::HttpBackendTrigger,
    PostRegistry, Watcher,
};
use snapshot_client::SnapshotClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("engagement_engine=info".parse()?)
                .add_directive("snapshot_client=info".parse()?),
        )
        .init();

    info!("Engagement watcher starting...");

    let config = Config::from_env()?;
    config.log_redacted();

    let client = Arc::new(SnapshotClient::new(config.api_token.clone()));

    // Manager view: registry is loaded once, independent of polling
    if let Some(location) = &config.registry {
        let mut registry = PostRegistry::new(registry_source(location, client.clone()));
        match registry.load().await {
            Ok(_) => info!(
                posts = registry.posts().len(),
                high = registry.count_by_category(Category::High),
                medium = registry.count_by_category(Category::Medium),
                low = registry.count_by_category(Category::Low),
                "Registry summary"
            ),
            Err(e) => warn!(error = %e, "Failed to load post registry"),
        }
    }

    // Sinks: log + in-memory table, plus webhook if configured
    let table = Arc::new(TableSink::new());
    let mut sinks: Vec<Arc<dyn EngagementSink>> = vec![Arc::new(LogSink), table.clone()];
    match &config.sink_webhook_url {
        Some(url) => {
            info!("Webhook sink enabled");
            sinks.push(Arc::new(WebhookSink::new(url.clone())));
        }
        None => info!("No SINK_WEBHOOK_URL set, records are logged only"),
    }

    let mut watcher = Watcher::new(
        snapshot_source(&config.snapshot, client.clone()),
        Arc::new(FanoutSink::new(sinks)),
        config.poll_interval,
    );
    if let Some(url) = &config.backend_trigger_url {
        let trigger = HttpBackendTrigger::new(client.clone(), url.clone());
        watcher = watcher.with_trigger(Arc::new(trigger));
    }

    match watcher.start().await {
        Some(report) if report.is_completed() => info!("Initial load complete. {report}"),
        Some(report) => warn!("Initial load did not complete, polling continues. {report}"),
        None => {}
    }

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");

    watcher.shutdown().await;

    info!(
        rows = table.len().await,
        seen = watcher.seen(),
        "Engagement watcher stopped"
    );
    Ok(())
}
