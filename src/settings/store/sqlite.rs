//! SQLite-backed options table
//!
//! One row per settings name; the value column holds a JSON object of
//! field key to value.

use super::PersistenceStore;
use crate::settings::types::ValueMap;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::path::Path;

/// Options store persisted in SQLite
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database file and ensure the schema exists
    pub async fn connect(db_path: &Path) -> Result<Self> {
        // Filename, not URL: paths may contain '?' or '#'.
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePool::connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", db_path.display()))?;

        log::debug!("Connected to SQLite database: {}", db_path.display());
        Self::from_pool(pool).await
    }

    /// In-memory database for testing
    pub async fn connect_memory() -> Result<Self> {
        // Each connection to :memory: is its own database, so keep one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .context("Failed to connect to in-memory database")?;

        log::debug!("Connected to in-memory SQLite database");
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating the options table if needed
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS options (
                name TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("Failed to create options table")?;

        Ok(Self { pool })
    }

    /// Replace every stored value for `name`
    pub async fn save(&self, name: &str, values: &ValueMap) -> Result<()> {
        let value_json =
            serde_json::to_string(values).context("Failed to serialize option values to JSON")?;

        sqlx::query(
            r#"
            INSERT INTO options (name, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(name) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(name)
        .bind(&value_json)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to save option '{}'", name))?;

        log::debug!("Saved option: {} ({} fields)", name, values.len());
        Ok(())
    }

    /// Set a single field, keeping the others
    pub async fn update_field(&self, name: &str, key: &str, value: Value) -> Result<()> {
        let mut values = self.read(name).await?;
        values.insert(key.to_string(), value);
        self.save(name, &values).await
    }

    /// Delete everything stored for `name`
    pub async fn delete(&self, name: &str) -> Result<()> {
        sqlx::query("DELETE FROM options WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to delete option '{}'", name))?;
        Ok(())
    }

    async fn get_raw(&self, name: &str) -> Result<Option<String>> {
        sqlx::query_scalar("SELECT value FROM options WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to get option '{}' from database", name))
    }
}

#[async_trait]
impl PersistenceStore for SqliteStore {
    async fn read(&self, name: &str) -> Result<ValueMap> {
        let Some(raw) = self.get_raw(name).await? else {
            return Ok(ValueMap::new());
        };

        let parsed: Value = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse stored option '{}' as JSON", name))?;

        match parsed {
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => {
                log::warn!(
                    "Option '{}' does not hold an object (found {}), treating as empty",
                    name,
                    other
                );
                Ok(ValueMap::new())
            }
        }
    }
}
