use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngagementError>;

#[derive(Error, Debug)]
pub enum EngagementError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Snapshot source error: {0}")]
    Source(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for EngagementError {
    fn from(err: serde_json::Error) -> Self {
        EngagementError::Parse(err.to_string())
    }
}
