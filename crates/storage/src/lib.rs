use anyhow::{Context, Result};
use async_trait::async_trait;
use engine::{
    domain::{HISTORY_STORAGE_KEY, MUTED_STORAGE_KEY},
    HistoryLog,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

const MEMORY_DATABASE_URL: &str = "sqlite::memory:";

/// Key/value preference store backed by SQLite.
#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid sqlite database url '{database_url}'"))?
            .create_if_missing(true);
        // Every connection to an in-memory database sees its own empty schema.
        let max_connections = if database_url.starts_with(MEMORY_DATABASE_URL) {
            1
        } else {
            4
        };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open sqlite database '{database_url}'"))?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run preference migrations")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM preferences WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to read preference '{key}'"))?;
        Ok(row.map(|r| r.get::<String, _>(0)))
    }

    pub async fn put_value(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO preferences (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to write preference '{key}'"))?;
        Ok(())
    }

    pub async fn delete_value(&self, key: &str) -> Result<bool> {
        let affected = sqlx::query("DELETE FROM preferences WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete preference '{key}'"))?
            .rows_affected();
        Ok(affected > 0)
    }

    /// Persisted history; unreadable documents are discarded, not reported.
    pub async fn load_history(&self) -> Result<HistoryLog> {
        let Some(raw) = self.get_value(HISTORY_STORAGE_KEY).await? else {
            return Ok(HistoryLog::new());
        };
        match HistoryLog::from_json(&raw) {
            Ok(log) => Ok(log),
            Err(err) => {
                tracing::warn!(key = HISTORY_STORAGE_KEY, "discarding malformed history: {err}");
                Ok(HistoryLog::new())
            }
        }
    }

    pub async fn save_history(&self, history: &HistoryLog) -> Result<()> {
        let raw = history.to_json().context("failed to encode history")?;
        self.put_value(HISTORY_STORAGE_KEY, &raw).await
    }

    pub async fn clear_history(&self) -> Result<()> {
        self.delete_value(HISTORY_STORAGE_KEY).await?;
        Ok(())
    }

    pub async fn load_muted(&self) -> Result<bool> {
        Ok(self
            .get_value(MUTED_STORAGE_KEY)
            .await?
            .is_some_and(|value| value == "true"))
    }

    pub async fn save_muted(&self, muted: bool) -> Result<()> {
        self.put_value(MUTED_STORAGE_KEY, if muted { "true" } else { "false" })
            .await
    }
}

/// Persistence seam for calculation history.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn load_history(&self) -> Result<HistoryLog>;
    async fn save_history(&self, history: &HistoryLog) -> Result<()>;
    async fn clear_history(&self) -> Result<()>;
}

#[async_trait]
impl HistoryStore for Storage {
    async fn load_history(&self) -> Result<HistoryLog> {
        Storage::load_history(self).await
    }

    async fn save_history(&self, history: &HistoryLog) -> Result<()> {
        Storage::save_history(self, history).await
    }

    async fn clear_history(&self) -> Result<()> {
        Storage::clear_history(self).await
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with(MEMORY_DATABASE_URL) || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
