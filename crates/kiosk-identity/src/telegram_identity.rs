//! Read-only accessor over the Telegram user id populated by the host bridge.

use std::sync::{Arc, Mutex};

/// Source of the current Telegram numeric user id.
///
/// The value is written by the host Telegram WebView bridge outside this
/// subsystem; request-handling code receives the source as an injected
/// capability and never mutates it.
pub trait TelegramIdentitySource: Send + Sync {
    fn current_user_id(&self) -> Option<i64>;
}

/// Bridge-populated identity cell shared between the WebView integration and
/// the request wrappers.
#[derive(Debug, Default, Clone)]
pub struct BridgeTelegramIdentity {
    cell: Arc<Mutex<Option<i64>>>,
}

impl BridgeTelegramIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called by the bridge integration when the host supplies a user.
    pub fn set_user_id(&self, user_id: Option<i64>) {
        let mut cell = match self.cell.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *cell = user_id;
    }
}

impl TelegramIdentitySource for BridgeTelegramIdentity {
    fn current_user_id(&self) -> Option<i64> {
        match self.cell.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Fixed identity used by tests and local harnesses.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedTelegramIdentity {
    user_id: Option<i64>,
}

impl FixedTelegramIdentity {
    pub fn new(user_id: Option<i64>) -> Self {
        Self { user_id }
    }
}

impl TelegramIdentitySource for FixedTelegramIdentity {
    fn current_user_id(&self) -> Option<i64> {
        self.user_id
    }
}
