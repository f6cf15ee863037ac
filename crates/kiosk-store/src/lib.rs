//! Relational storage for kiosk orders and conventional sessions.
//!
//! Both stores open a pooled-style per-call SQLite connection (WAL,
//! busy-timeout) released by RAII on every path. Timestamps persist as
//! RFC3339 text.

use thiserror::Error;

mod order_store;
mod session_directory;

pub use order_store::{NewOrder, OrderRecord, OrderStore, SqliteOrderStore};
pub use session_directory::{
    telegram_user_id_for_session, FixedSessionDirectory, SessionDirectory, SessionUser,
    SqliteSessionDirectory, DEFAULT_TELEGRAM_ADMIN_EMAIL,
};

/// Rows older than this survive no read: the retention purge runs before
/// every tenant-scoped query.
pub const ORDER_RETENTION_SECONDS: i64 = 86_400;

/// Cap on rows returned by a tenant-scoped order read.
pub const USER_ORDERS_QUERY_LIMIT: usize = 50;

/// Result type for kiosk store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid order field '{field}': {value}")]
    InvalidOrderField { field: &'static str, value: String },
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Chrono(#[from] chrono::ParseError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
