//! PostgreSQL implementation of the drink store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::DrinkStore;
use crate::config::ApiConfig;
use crate::domain::{BiologicalSex, DrinkEvent, User};
use crate::error::StoreError;

const CREATE_USERS: &str = "CREATE TABLE IF NOT EXISTS users (\
     user_id TEXT PRIMARY KEY, \
     sex TEXT NOT NULL, \
     weight_kg DOUBLE PRECISION NOT NULL CHECK (weight_kg > 0), \
     primary_contact TEXT, \
     is_cut_off BOOLEAN NOT NULL DEFAULT FALSE)";

const CREATE_DRINKS: &str = "CREATE TABLE IF NOT EXISTS drinks (\
     id BIGSERIAL PRIMARY KEY, \
     drink_id TEXT NOT NULL, \
     user_id TEXT NOT NULL, \
     alcohol_grams DOUBLE PRECISION NOT NULL CHECK (alcohol_grams >= 0), \
     timestamp TIMESTAMPTZ NOT NULL)";

const CREATE_DRINKS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS drinks_user_ts_idx ON drinks (user_id, timestamp DESC)";

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the database is unreachable.
    pub async fn connect(config: &ApiConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Creates tables and the `(user_id, timestamp DESC)` index. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if any DDL statement fails.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for ddl in [CREATE_USERS, CREATE_DRINKS, CREATE_DRINKS_INDEX] {
            sqlx::query(ddl).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Closes the pool, waiting for checked-out connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

type UserRow = (String, String, f64, Option<String>, bool);

fn user_from_row(row: UserRow) -> Result<User, StoreError> {
    let (user_id, sex, weight_kg, primary_contact, is_cut_off) = row;
    let sex: BiologicalSex = sex
        .parse()
        .map_err(|e| StoreError::CorruptRecord(format!("user {user_id}: {e}")))?;
    Ok(User {
        user_id,
        sex,
        weight_kg,
        primary_contact,
        is_cut_off,
    })
}

#[async_trait]
impl DrinkStore for PostgresStore {
    async fn find_user(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT user_id, sex, weight_kg, primary_contact, is_cut_off FROM users \
             WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(user_from_row).transpose()
    }

    async fn find_most_recent_drink(
        &self,
        user_id: &str,
    ) -> Result<Option<DrinkEvent>, StoreError> {
        let row = sqlx::query_as::<_, (String, String, f64, DateTime<Utc>)>(
            "SELECT drink_id, user_id, alcohol_grams, timestamp FROM drinks \
             WHERE user_id = $1 ORDER BY timestamp DESC, id DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(drink_id, user_id, alcohol_grams, timestamp)| DrinkEvent {
            drink_id,
            user_id,
            alcohol_grams,
            timestamp,
        }))
    }

    async fn insert_drink(&self, drink: DrinkEvent) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO drinks (drink_id, user_id, alcohol_grams, timestamp) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&drink.drink_id)
        .bind(&drink.user_id)
        .bind(drink.alcohol_grams)
        .bind(drink.timestamp)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
