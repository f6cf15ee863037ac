//! Admin authorization for the kiosk storefront.
//!
//! The allow-list lives behind the [`AdminDirectory`] trait so the gate's
//! fail-closed contract can be exercised with fault-injected lookups. The gate
//! itself never returns an error: any ambiguity resolves to "not admin".

use thiserror::Error;

mod admin_directory;
mod admin_gate;

pub use admin_directory::{AdminDirectory, AdminEntry, FixedAdminDirectory, SqliteAdminDirectory};
pub use admin_gate::{evaluate_admin_claim, normalize_admin_claim, AdminDecision};

/// Result type for allow-list directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Errors returned by allow-list directory implementations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("invalid telegram user id '{0}'")]
    InvalidTelegramUserId(String),
    #[error("allow-list lookup failed: {0}")]
    Lookup(String),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Chrono(#[from] chrono::ParseError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
