//! Client-side identity stores for the kiosk storefront.
//!
//! Covers the demo-session correlation identifier, the Telegram user id
//! populated by the host WebView bridge, and the admin preview toggle. All
//! persisted state goes through the injected [`ClientStorage`] capability so
//! the stores stay testable without a real browser storage handle.

pub mod admin_preview;
pub mod client_storage;
pub mod demo_session;
pub mod telegram_identity;

pub use admin_preview::AdminPreviewStore;
pub use client_storage::{
    ClientStorage, FileClientStorage, ADMIN_PREVIEW_STORAGE_KEY, DEMO_SESSION_STORAGE_KEY,
};
pub use demo_session::{is_canonical_demo_session_id, DemoSessionStore};
pub use telegram_identity::{
    BridgeTelegramIdentity, FixedTelegramIdentity, TelegramIdentitySource,
};
