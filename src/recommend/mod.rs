//! Recommender handle used by the evaluation: anything that can produce a
//! ranked top-N list for a user.

use crate::data::{ItemId, UserId};
use crate::error::Result;
use std::collections::HashMap;
use std::path::Path;

/// Produces ranked recommendation lists, best item first.
pub trait Recommender: Send + Sync {
    /// Return at most `n` items for `user`, in rank order.
    fn recommend(&self, user: UserId, n: usize) -> Vec<ItemId>;
}

/// Recommender backed by lists computed ahead of time (e.g. by an external
/// training run). Users without a stored list get an empty list.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedRecommender {
    lists: HashMap<UserId, Vec<ItemId>>,
}

impl PrecomputedRecommender {
    pub fn new(lists: HashMap<UserId, Vec<ItemId>>) -> Self {
        Self { lists }
    }

    /// Parse `{"<user id>": [item, item, ...], ...}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let lists: HashMap<UserId, Vec<ItemId>> = serde_json::from_str(json)?;
        Ok(Self::new(lists))
    }

    pub fn from_json_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let rec = Self::from_json_str(&json)?;
        log::info!(
            "Loaded precomputed recommendations for {} users from {}",
            rec.lists.len(),
            path.display()
        );
        Ok(rec)
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

impl Recommender for PrecomputedRecommender {
    fn recommend(&self, user: UserId, n: usize) -> Vec<ItemId> {
        match self.lists.get(&user) {
            Some(items) => items.iter().take(n).copied().collect(),
            None => {
                log::debug!("No precomputed recommendations for user {}", user);
                Vec::new()
            }
        }
    }
}
