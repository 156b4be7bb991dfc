use std::collections::{BTreeMap, BTreeSet};

use crate::error::StoreError;

/// Read side of the user document store: a `users` collection where every
/// user document owns a `friends` sub-collection keyed by friend id.
pub trait DocumentStore {
    async fn user_ids(&self) -> Result<Vec<String>, StoreError>;

    async fn friend_ids(&self, user_id: &str) -> Result<Vec<String>, StoreError>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    friends: BTreeMap<String, BTreeSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&mut self, user_id: impl Into<String>) {
        self.friends.entry(user_id.into()).or_default();
    }

    /// Records `friend_id` in `user_id`'s sub-collection only; the reverse
    /// record is not implied.
    pub fn insert_friend(&mut self, user_id: impl Into<String>, friend_id: impl Into<String>) {
        self.friends
            .entry(user_id.into())
            .or_default()
            .insert(friend_id.into());
    }

    pub fn user_count(&self) -> usize {
        self.friends.len()
    }
}

impl DocumentStore for MemoryStore {
    async fn user_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.friends.keys().cloned().collect())
    }

    async fn friend_ids(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .friends
            .get(user_id)
            .map(|friends| friends.iter().cloned().collect())
            .unwrap_or_default())
    }
}
