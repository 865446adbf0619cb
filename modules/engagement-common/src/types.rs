use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between post id and user id in a ledger key.
pub const LEDGER_KEY_SEPARATOR: &str = "::";

// --- Snapshot input ---

/// One post from a polled snapshot, after the flattener has discarded entries
/// without a post id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostSnapshot {
    pub post_id: String,
    pub flag: Option<String>,
    pub reactions: Vec<Reaction>,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reaction {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub text: Option<String>,
    pub created_time: Option<String>,
}

/// Returns the id when it is present and not blank.
pub fn usable_id(id: Option<&str>) -> Option<&str> {
    id.map(str::trim).filter(|id| !id.is_empty())
}

impl Reaction {
    pub fn usable_user_id(&self) -> Option<&str> {
        usable_id(self.user_id.as_deref())
    }
}

impl Comment {
    pub fn usable_user_id(&self) -> Option<&str> {
        usable_id(self.user_id.as_deref())
    }
}

// --- Classification ---

/// Severity bucket derived from a post's moderation flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Low,
    Medium,
    High,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Output ---

/// One reconciled (post, user) engagement, the unit handed to sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementRecord {
    pub post_id: String,
    pub user_id: String,
    /// Reaction name, else comment name, else empty.
    pub display_name: String,
    pub has_reaction: bool,
    /// Text of the user's latest comment; empty when the user only reacted.
    pub comment_text: String,
    pub display_time: DateTime<Utc>,
    pub category: Category,
}

impl EngagementRecord {
    /// Identity used for duplicate suppression.
    pub fn key(&self) -> (&str, &str) {
        (&self.post_id, &self.user_id)
    }

    /// Printable form of `key()`, for logs and exports. Not unique when ids
    /// contain the separator.
    pub fn ledger_key(&self) -> String {
        format!("{}{}{}", self.post_id, LEDGER_KEY_SEPARATOR, self.user_id)
    }
}

/// A post listed in the manager-facing registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredPost {
    pub id: String,
    pub text: String,
    pub flag: Option<String>,
    pub category: Category,
}
