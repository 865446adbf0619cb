use std::env;
use std::time::Duration;

use tracing::info;

use crate::error::{EngagementError, Result};

/// Default snapshot poll period.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Where a JSON document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Http(String),
    File(String),
}

impl Location {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Http(raw.to_string())
        } else {
            Self::File(raw.strip_prefix("file://").unwrap_or(raw).to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Http(s) | Self::File(s) => s,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Sources
    pub snapshot: Location,
    pub registry: Option<Location>,

    // Collaborators
    pub backend_trigger_url: Option<String>,
    pub sink_webhook_url: Option<String>,
    pub api_token: Option<String>,

    // Polling
    pub poll_interval: Duration,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let snapshot = optional("SNAPSHOT_URL")
            .map(|v| Location::parse(&v))
            .ok_or_else(|| {
                EngagementError::Config("SNAPSHOT_URL environment variable is required".into())
            })?;

        let poll_interval_secs = match optional("POLL_INTERVAL_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                EngagementError::Config(format!("POLL_INTERVAL_SECS must be a number, got {raw:?}"))
            })?,
            None => DEFAULT_POLL_INTERVAL_SECS,
        };
        if poll_interval_secs == 0 {
            return Err(EngagementError::Config(
                "POLL_INTERVAL_SECS must be greater than zero".into(),
            ));
        }

        Ok(Self {
            snapshot,
            registry: optional("REGISTRY_URL").map(|v| Location::parse(&v)),
            backend_trigger_url: optional("BACKEND_TRIGGER_URL"),
            sink_webhook_url: optional("SINK_WEBHOOK_URL"),
            api_token: optional("API_TOKEN"),
            poll_interval: Duration::from_secs(poll_interval_secs),
        })
    }

    /// Log the effective configuration with secrets masked.
    pub fn log_redacted(&self) {
        let set_or_dash = |v: &Option<String>| if v.is_some() { "set" } else { "-" };
        info!(
            snapshot = self.snapshot.as_str(),
            registry = self.registry.as_ref().map(Location::as_str).unwrap_or("-"),
            backend_trigger = self.backend_trigger_url.as_deref().unwrap_or("-"),
            sink_webhook = set_or_dash(&self.sink_webhook_url),
            api_token = set_or_dash(&self.api_token),
            poll_interval_secs = self.poll_interval.as_secs(),
            "Configuration loaded"
        );
    }
}
