//! Conventional (non-Telegram) session lookup used by the session status
//! endpoint.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::StoreResult;

/// Reserved sentinel account letting the Telegram bot hold an
/// admin-equivalent session without a full login UI.
pub const DEFAULT_TELEGRAM_ADMIN_EMAIL: &str = "telegram-admin@kiosk.local";

/// User identity attached to a conventional session.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
}

/// External session-management collaborator resolving an ambient token to its
/// user, if the session exists.
#[async_trait]
pub trait SessionDirectory: Send + Sync {
    async fn resolve_session(&self, token: &str) -> StoreResult<Option<SessionUser>>;
}

/// Returns the Telegram user id surfaced for a session: populated only when
/// the session user's email matches the telegram-admin sentinel (ASCII
/// case-insensitive), in which case the session user id carries the Telegram
/// id.
pub fn telegram_user_id_for_session(user: &SessionUser, sentinel_email: &str) -> Option<String> {
    if user.email.trim().eq_ignore_ascii_case(sentinel_email.trim()) {
        Some(user.id.clone())
    } else {
        None
    }
}

/// SQLite-backed session directory with per-call connections.
#[derive(Debug)]
pub struct SqliteSessionDirectory {
    db_path: PathBuf,
}

impl SqliteSessionDirectory {
    pub fn new(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db_path = path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let directory = Self { db_path };
        let connection = directory.open_connection()?;
        connection.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                token TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                email TEXT NOT NULL,
                display_name TEXT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(directory)
    }

    fn open_connection(&self) -> StoreResult<Connection> {
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

    /// Records a session issued by the external login collaborator.
    pub fn insert_session(&self, token: &str, user: &SessionUser) -> StoreResult<()> {
        let connection = self.open_connection()?;
        connection.execute(
            r#"
            INSERT OR REPLACE INTO sessions (token, user_id, email, display_name, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                token,
                user.id,
                user.email,
                user.display_name,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

#[async_trait]
impl SessionDirectory for SqliteSessionDirectory {
    async fn resolve_session(&self, token: &str) -> StoreResult<Option<SessionUser>> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(None);
        }
        let connection = self.open_connection()?;
        let user = connection
            .query_row(
                "SELECT user_id, email, display_name FROM sessions WHERE token = ?1",
                params![token],
                |row| {
                    Ok(SessionUser {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        display_name: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }
}

/// Fixed in-memory session directory for tests.
#[derive(Debug, Default)]
pub struct FixedSessionDirectory {
    sessions: Mutex<BTreeMap<String, SessionUser>>,
}

impl FixedSessionDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, token: impl Into<String>, user: SessionUser) {
        let mut sessions = match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        sessions.insert(token.into(), user);
    }
}

#[async_trait]
impl SessionDirectory for FixedSessionDirectory {
    async fn resolve_session(&self, token: &str) -> StoreResult<Option<SessionUser>> {
        let sessions = match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Ok(sessions.get(token.trim()).cloned())
    }
}
