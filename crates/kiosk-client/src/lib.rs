//! Outbound request tagging and the typed storefront API client.

mod request_tagging;
mod storefront_client;

pub use request_tagging::{
    tag_demo_session, tag_telegram_identity, DEMO_SESSION_HEADER, TELEGRAM_USER_HEADER,
};
pub use storefront_client::{SessionStatus, StorefrontApiClient};
