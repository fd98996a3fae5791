use std::str::FromStr;

use snackquest_types::{EngineError, User};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

const SCHEMA: &str = include_str!("schema.sql");

/// Handle to the portal database. Cheap to clone; all engine components
/// share one pool. The users and resources tables are only ever mutated
/// through the component contracts in this crate.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (creating if missing) the database at `url` and apply the schema.
    pub async fn open(url: &str) -> Result<Self, EngineError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.migrate().await?;
        info!(url, "database ready");
        Ok(store)
    }

    /// In-memory database for tests and local experiments. A single
    /// connection keeps the database alive for the pool's lifetime.
    pub async fn open_in_memory() -> Result<Self, EngineError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), EngineError> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Look up a user whose email, phone, or username equals `identifier`.
    pub async fn user_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, EngineError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, phone, username, password_hash, authorized, created_at, introduction \
             FROM users WHERE email = ?1 OR phone = ?1 OR username = ?1 LIMIT 1",
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn user_by_id(&self, user_id: i64) -> Result<Option<User>, EngineError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, phone, username, password_hash, authorized, created_at, introduction \
             FROM users WHERE id = ?1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

/// Which unique column a failed insert collided on, if any.
pub(crate) fn duplicate_field(err: &sqlx::Error) -> Option<&'static str> {
    let db = err.as_database_error()?;
    if !db.is_unique_violation() {
        return None;
    }
    let message = db.message();
    if message.contains("users.email") {
        Some("email")
    } else if message.contains("users.phone") {
        Some("phone")
    } else if message.contains("users.username") {
        Some("username")
    } else {
        Some("account")
    }
}
