use thiserror::Error;

pub type Result<T> = std::result::Result<T, SnapshotClientError>;

#[derive(Debug, Error)]
pub enum SnapshotClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SnapshotClientError {
    fn from(err: reqwest::Error) -> Self {
        SnapshotClientError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SnapshotClientError {
    fn from(err: serde_json::Error) -> Self {
        SnapshotClientError::Parse(err.to_string())
    }
}
