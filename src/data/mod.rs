//! Test data: users with training and held-out items, and the item universe.

use crate::error::{EvalError, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Opaque catalog item identifier.
pub type ItemId = i64;

/// Opaque user identifier.
pub type UserId = i64;

/// A user in the test split, with the items used for training and the held-out
/// items (with ratings) the recommender is evaluated against.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestUser {
    pub user_id: UserId,
    #[serde(default)]
    pub train_items: HashSet<ItemId>,
    /// Held-out items keyed by item id; value is the user's rating.
    #[serde(default)]
    pub test_items: HashMap<ItemId, f64>,
}

impl TestUser {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            ..Default::default()
        }
    }

    /// Add training items (builder style, mostly for tests and small harnesses).
    pub fn with_train_items(mut self, items: impl IntoIterator<Item = ItemId>) -> Self {
        self.train_items.extend(items);
        self
    }

    /// Add held-out items with their ratings.
    pub fn with_test_items(mut self, items: impl IntoIterator<Item = (ItemId, f64)>) -> Self {
        self.test_items.extend(items);
        self
    }

    /// Ids of the held-out test items.
    pub fn test_item_ids(&self) -> HashSet<ItemId> {
        self.test_items.keys().copied().collect()
    }
}

#[derive(Deserialize)]
struct RawDataSet {
    #[serde(default)]
    name: Option<String>,
    users: Vec<TestUser>,
}

/// One evaluation dataset: the test users plus the universe of known items.
#[derive(Debug, Clone)]
pub struct DataSet {
    pub name: String,
    users: Vec<TestUser>,
    universe: HashSet<ItemId>,
}

impl DataSet {
    /// Build a dataset from test users. The universe is every item appearing in
    /// any user's train or test items.
    ///
    /// Returns `InvalidInput` if a user id appears twice.
    pub fn new(name: impl Into<String>, users: Vec<TestUser>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(users.len());
        let mut universe = HashSet::new();
        for user in &users {
            if !seen.insert(user.user_id) {
                return Err(EvalError::InvalidInput(format!(
                    "duplicate user id {} in test data",
                    user.user_id
                )));
            }
            universe.extend(user.train_items.iter().copied());
            universe.extend(user.test_items.keys().copied());
        }
        Ok(Self {
            name: name.into(),
            users,
            universe,
        })
    }

    /// Parse a dataset from its JSON form:
    /// `{"name": "...", "users": [{"user_id": 1, "train_items": [..], "test_items": {"5": 4.0}}]}`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawDataSet = serde_json::from_str(json)?;
        Self::new(raw.name.unwrap_or_else(|| "unnamed".to_string()), raw.users)
    }

    /// Read and parse a dataset JSON file.
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let dataset = Self::from_json_str(&json)?;
        log::info!(
            "Loaded dataset {} from {} ({} users, {} items)",
            dataset.name,
            path.display(),
            dataset.users.len(),
            dataset.universe.len()
        );
        Ok(dataset)
    }

    pub fn users(&self) -> &[TestUser] {
        &self.users
    }

    pub fn universe(&self) -> &HashSet<ItemId> {
        &self.universe
    }

    pub fn user(&self, user_id: UserId) -> Result<&TestUser> {
        self.users
            .iter()
            .find(|u| u.user_id == user_id)
            .ok_or(EvalError::UnknownUser(user_id))
    }
}
