//! SQLite-backed key/value storage for UI state.

use bookhub_core::{
    bundle::LanguageBundle,
    config::StorageConfig,
    error::BookhubError,
    lang::{Lang, Theme, UiState},
    shellexpand,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{info, warn};

/// Stored language code.
pub const KEY_LANG: &str = "lang";
/// Stored theme (`dark-mode` | `light-mode`).
pub const KEY_THEME: &str = "theme";
/// Cached translation blob, written externally.
pub const KEY_TRANSLATIONS: &str = "translations";

/// Durable key/value store.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (or create) the store at the configured path.
    pub async fn new(config: &StorageConfig) -> Result<Self, BookhubError> {
        let db_path = shellexpand(&config.db_path);

        if let Some(parent) = std::path::Path::new(&db_path).parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| BookhubError::Storage(format!("failed to create data dir: {e}")))?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| BookhubError::Storage(format!("invalid db path: {e}")))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect_with(opts)
            .await
            .map_err(|e| BookhubError::Storage(format!("failed to connect to sqlite: {e}")))?;

        Self::run_migrations(&pool).await?;

        info!("Storage initialized at {db_path}");

        Ok(Self { pool })
    }

    /// An empty store that lives as long as the process.
    pub async fn in_memory() -> Result<Self, BookhubError> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| BookhubError::Storage(format!("invalid db path: {e}")))?;
        // One connection: every pooled connection would get its own database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .map_err(|e| BookhubError::Storage(format!("failed to open sqlite: {e}")))?;
        Self::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<(), BookhubError> {
        sqlx::raw_sql(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )
        .execute(pool)
        .await
        .map_err(|e| BookhubError::Storage(format!("migration failed: {e}")))?;
        Ok(())
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, BookhubError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| BookhubError::Storage(format!("get {key}: {e}")))?;
        Ok(row.map(|(v,)| v))
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<(), BookhubError> {
        sqlx::query(
            "INSERT INTO kv (key, value) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| BookhubError::Storage(format!("set {key}: {e}")))?;
        Ok(())
    }

    /// Remove `key`. Returns whether it existed.
    pub async fn remove(&self, key: &str) -> Result<bool, BookhubError> {
        let result = sqlx::query("DELETE FROM kv WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| BookhubError::Storage(format!("remove {key}: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Read the persisted UI state.
    ///
    /// A missing or unusable language falls back to `default_lang`; a
    /// missing theme is light.
    pub async fn ui_state(&self, default_lang: &Lang) -> Result<UiState, BookhubError> {
        let lang = match self.get(KEY_LANG).await? {
            Some(code) if !code.is_empty() => Lang::new(&code).unwrap_or_else(|e| {
                warn!("ignoring stored language: {e}");
                default_lang.clone()
            }),
            _ => default_lang.clone(),
        };
        let theme = self
            .get(KEY_THEME)
            .await?
            .map(|v| Theme::from_stored(&v))
            .unwrap_or_default();
        Ok(UiState { lang, theme })
    }

    pub async fn save_lang(&self, lang: &Lang) -> Result<(), BookhubError> {
        self.set(KEY_LANG, lang.code()).await
    }

    pub async fn save_theme(&self, theme: Theme) -> Result<(), BookhubError> {
        self.set(KEY_THEME, theme.as_str()).await
    }

    /// The externally written translation blob, if present and parseable.
    pub async fn cached_translations(&self) -> Result<Option<LanguageBundle>, BookhubError> {
        let Some(blob) = self.get(KEY_TRANSLATIONS).await? else {
            return Ok(None);
        };
        match LanguageBundle::from_json(&blob) {
            Ok(bundle) => Ok(Some(bundle)),
            Err(e) => {
                warn!("ignoring malformed cached translations: {e}");
                Ok(None)
            }
        }
    }
}
