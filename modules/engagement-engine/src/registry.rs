use std::sync::Arc;

use tracing::info;

use engagement_common::{usable_id, Category, RegisteredPost, Result};

use crate::classify::classify;
use crate::sources::RegistrySource;

/// Post registry for the manager view, loaded at most once per session.
pub struct PostRegistry {
    source: Arc<dyn RegistrySource>,
    posts: Vec<RegisteredPost>,
    loaded: bool,
}

impl PostRegistry {
    pub fn new(source: Arc<dyn RegistrySource>) -> Self {
        Self {
            source,
            posts: Vec::new(),
            loaded: false,
        }
    }

    /// Fetch the registry unless it is already loaded.
    ///
    /// Returns `true` when this call performed the load. A failed fetch
    /// leaves the registry unloaded so a later call can retry.
    pub async fn load(&mut self) -> Result<bool> {
        if self.loaded {
            return Ok(false);
        }

        let entries = self.source.fetch_registry().await?;
        self.posts = entries
            .into_iter()
            .filter_map(|entry| {
                let id = usable_id(entry.id.as_deref())?.to_string();
                let category = classify(entry.flag.as_deref());
                Some(RegisteredPost {
                    id,
                    text: entry.text.unwrap_or_default(),
                    flag: entry.flag,
                    category,
                })
            })
            .collect();
        self.loaded = true;

        info!(posts = self.posts.len(), "Post registry loaded");
        Ok(true)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn posts(&self) -> &[RegisteredPost] {
        &self.posts
    }

    pub fn get(&self, id: &str) -> Option<&RegisteredPost> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn count_by_category(&self, category: Category) -> usize {
        self.posts.iter().filter(|p| p.category == category).count()
    }

    /// Forget the loaded posts so the next `load` fetches again.
    pub fn clear(&mut self) {
        self.posts.clear();
        self.loaded = false;
    }
}
