//! Identity headers attached to outbound storefront requests.
//!
//! Two independent, composable taggers over a built [`reqwest::Request`].
//! Each inserts its header only when the backing store holds a value; an
//! absent store value omits the header entirely, never sends an empty string.
//! Caller-supplied headers are layered after the identity header: when the
//! caller already set the same key, the caller's value stands and exactly one
//! coherent value goes on the wire. Method, body, and all other caller
//! headers pass through unchanged.

use kiosk_identity::{DemoSessionStore, TelegramIdentitySource};
use reqwest::header::HeaderValue;

/// Demo-session isolation claim consumed by storefront collaborators.
pub const DEMO_SESSION_HEADER: &str = "x-demo-session-id";
/// Admin identity claim evaluated by the server-side authorization gate.
pub const TELEGRAM_USER_HEADER: &str = "x-telegram-user-id";

/// Attaches `x-demo-session-id` when a demo session exists.
pub fn tag_demo_session(request: &mut reqwest::Request, session: &DemoSessionStore) {
    let Some(session_id) = session.get() else {
        return;
    };
    // A persisted value that is not a valid header value is dropped rather
    // than corrupting the request.
    let Ok(value) = HeaderValue::from_str(&session_id) else {
        return;
    };
    request
        .headers_mut()
        .entry(DEMO_SESSION_HEADER)
        .or_insert(value);
}

/// Attaches `x-telegram-user-id` when the identity source yields a user.
///
/// With no Telegram identity the request proceeds unauthenticated; the server
/// treats the missing header as "not admin", never as an error.
pub fn tag_telegram_identity(request: &mut reqwest::Request, identity: &dyn TelegramIdentitySource) {
    let Some(user_id) = identity.current_user_id() else {
        return;
    };
    let Ok(value) = HeaderValue::from_str(&user_id.to_string()) else {
        return;
    };
    request
        .headers_mut()
        .entry(TELEGRAM_USER_HEADER)
        .or_insert(value);
}
