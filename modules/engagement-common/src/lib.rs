pub mod config;
pub mod error;
pub mod time;
pub mod types;

pub use config::Config;
pub use error::{EngagementError, Result};
pub use types::*;
