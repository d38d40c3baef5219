//! In-memory store used for local runs and tests.
//!
//! [`InMemoryStore`] keeps users in a `HashMap` and drink history as a
//! per-user append-only `Vec`, each behind a [`tokio::sync::RwLock`].

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::DrinkStore;
use crate::domain::{DrinkEvent, User};
use crate::error::{ApiError, StoreError};

/// Process-local document store.
///
/// # Concurrency
///
/// - Reads of users and drinks proceed concurrently.
/// - Drink inserts are serialized by the outer write lock.
/// - A find-then-insert done by a caller spans two lock acquisitions and is
///   therefore not atomic.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<String, User>>,
    drinks: RwLock<HashMap<String, Vec<DrinkEvent>>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user record. Stands in for the user-management
    /// collaborator.
    pub async fn upsert_user(&self, user: User) {
        self.users.write().await.insert(user.user_id.clone(), user);
    }

    /// Loads users from a JSON array file. Every record is re-validated.
    ///
    /// Returns the number of users loaded.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if the file cannot be read or decoded,
    /// and [`ApiError::Validation`] for an invalid record.
    pub async fn seed_from_file(&self, path: &Path) -> Result<usize, ApiError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ApiError::Internal(format!("reading {}: {e}", path.display())))?;
        self.seed_from_json(&raw).await
    }

    /// Loads users from a JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] for malformed JSON and
    /// [`ApiError::Validation`] for an invalid record.
    pub async fn seed_from_json(&self, raw: &str) -> Result<usize, ApiError> {
        let records: Vec<User> = serde_json::from_str(raw)
            .map_err(|e| ApiError::Internal(format!("decoding seed users: {e}")))?;
        let count = records.len();
        for record in records {
            let user = User::new(record.user_id, record.sex, record.weight_kg)?
                .with_cut_off(record.is_cut_off);
            let user = match record.primary_contact {
                Some(contact) => user.with_primary_contact(contact),
                None => user,
            };
            self.upsert_user(user).await;
        }
        Ok(count)
    }

    /// Returns the full drink history for `user_id` in insertion order.
    pub async fn drinks_for(&self, user_id: &str) -> Vec<DrinkEvent> {
        self.drinks
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Total number of stored drinks across all users.
    pub async fn drink_count(&self) -> usize {
        self.drinks.read().await.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl DrinkStore for InMemoryStore {
    async fn find_user(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn find_most_recent_drink(
        &self,
        user_id: &str,
    ) -> Result<Option<DrinkEvent>, StoreError> {
        let drinks = self.drinks.read().await;
        // `max_by_key` yields the last of equal maxima, so ties favour the
        // latest insert.
        Ok(drinks
            .get(user_id)
            .and_then(|history| history.iter().max_by_key(|d| d.timestamp))
            .cloned())
    }

    async fn insert_drink(&self, drink: DrinkEvent) -> Result<(), StoreError> {
        self.drinks
            .write()
            .await
            .entry(drink.user_id.clone())
            .or_default()
            .push(drink);
        Ok(())
    }
}
