//! Persistence layer: the document-store contract consumed by drink
//! validation, plus in-memory and PostgreSQL adapters.
//!
//! Store handles are long-lived and owned by the application shell; the
//! core only ever sees them as an injected `Arc<dyn DrinkStore>`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::{DrinkEvent, User};
use crate::error::StoreError;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

/// Minimal store contract for drink validation.
///
/// The check-then-insert sequence performed by callers is not atomic at
/// this layer. Adapters that must prevent double-accepts under concurrency
/// need to serialize per user themselves.
#[async_trait]
pub trait DrinkStore: Send + Sync + std::fmt::Debug {
    /// Looks up a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on connectivity or mapping failure.
    async fn find_user(&self, user_id: &str) -> Result<Option<User>, StoreError>;

    /// Returns the user's latest drink by timestamp; ties go to the most
    /// recently inserted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on connectivity or mapping failure.
    async fn find_most_recent_drink(&self, user_id: &str)
    -> Result<Option<DrinkEvent>, StoreError>;

    /// Appends a drink to the user's history.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    async fn insert_drink(&self, drink: DrinkEvent) -> Result<(), StoreError>;
}
