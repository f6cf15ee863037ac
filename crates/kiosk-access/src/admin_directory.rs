//! Allow-list lookups backing the admin authorization gate.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::{DirectoryError, DirectoryResult};

/// External record of Telegram user ids permitted to act as administrators.
#[async_trait]
pub trait AdminDirectory: Send + Sync {
    async fn has_admin(&self, telegram_user_id: &str) -> DirectoryResult<bool>;
}

/// One allow-list row, as listed by operational tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminEntry {
    pub telegram_user_id: String,
    pub added_at: DateTime<Utc>,
}

/// SQLite-backed allow-list with per-call connections.
#[derive(Debug)]
pub struct SqliteAdminDirectory {
    db_path: PathBuf,
}

impl SqliteAdminDirectory {
    /// Opens (or creates) the allow-list database at `path`.
    pub fn new(path: impl AsRef<Path>) -> DirectoryResult<Self> {
        let db_path = path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let directory = Self { db_path };
        let connection = directory.open_connection()?;
        connection.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS admin_allowlist (
                telegram_user_id TEXT PRIMARY KEY,
                added_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(directory)
    }

    fn open_connection(&self) -> DirectoryResult<Connection> {
        let connection = Connection::open(&self.db_path)?;
        connection.busy_timeout(Duration::from_secs(5))?;
        connection.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            "#,
        )?;
        Ok(connection)
    }

    /// Adds an id to the allow-list. Re-adding an existing id keeps the
    /// original `added_at`.
    pub fn add_admin(&self, telegram_user_id: &str) -> DirectoryResult<()> {
        let telegram_user_id = validated_directory_id(telegram_user_id)?;
        let connection = self.open_connection()?;
        connection.execute(
            "INSERT OR IGNORE INTO admin_allowlist (telegram_user_id, added_at) VALUES (?1, ?2)",
            params![telegram_user_id, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Removes an id from the allow-list; returns true when a row was deleted.
    pub fn remove_admin(&self, telegram_user_id: &str) -> DirectoryResult<bool> {
        let telegram_user_id = validated_directory_id(telegram_user_id)?;
        let connection = self.open_connection()?;
        let removed = connection.execute(
            "DELETE FROM admin_allowlist WHERE telegram_user_id = ?1",
            params![telegram_user_id],
        )?;
        Ok(removed > 0)
    }

    pub fn list_admins(&self) -> DirectoryResult<Vec<AdminEntry>> {
        let connection = self.open_connection()?;
        let mut statement = connection.prepare(
            "SELECT telegram_user_id, added_at FROM admin_allowlist ORDER BY telegram_user_id ASC",
        )?;
        let mut rows = statement.query([])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            let added_at: String = row.get(1)?;
            entries.push(AdminEntry {
                telegram_user_id: row.get(0)?,
                added_at: DateTime::parse_from_rfc3339(&added_at)?.with_timezone(&Utc),
            });
        }
        Ok(entries)
    }
}

#[async_trait]
impl AdminDirectory for SqliteAdminDirectory {
    async fn has_admin(&self, telegram_user_id: &str) -> DirectoryResult<bool> {
        let connection = self.open_connection()?;
        let found = connection
            .query_row(
                "SELECT 1 FROM admin_allowlist WHERE telegram_user_id = ?1",
                params![telegram_user_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

fn validated_directory_id(telegram_user_id: &str) -> DirectoryResult<&str> {
    let telegram_user_id = telegram_user_id.trim();
    if telegram_user_id.is_empty() || !telegram_user_id.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(DirectoryError::InvalidTelegramUserId(
            telegram_user_id.to_string(),
        ));
    }
    Ok(telegram_user_id)
}

/// Fixed in-memory allow-list for tests and local harnesses.
#[derive(Debug, Default, Clone)]
pub struct FixedAdminDirectory {
    ids: BTreeSet<String>,
}

impl FixedAdminDirectory {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl AdminDirectory for FixedAdminDirectory {
    async fn has_admin(&self, telegram_user_id: &str) -> DirectoryResult<bool> {
        Ok(self.ids.contains(telegram_user_id))
    }
}
