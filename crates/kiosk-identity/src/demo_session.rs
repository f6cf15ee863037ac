//! Demo session identity store.
//!
//! The demo session id is a client-generated correlation key in the canonical
//! UUID-v4 textual shape. It scopes storefront data to one anonymous visitor
//! across requests; it is not a security credential.

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use uuid::Uuid;

use crate::client_storage::{ClientStorage, DEMO_SESSION_STORAGE_KEY};

#[derive(Debug, Default)]
struct DemoSessionState {
    session_id: Option<String>,
    is_demo_mode: bool,
}

/// In-memory view of the persisted demo session, synchronized through an
/// injected [`ClientStorage`] capability.
///
/// A store created with [`DemoSessionStore::detached`] has no storage attached
/// (the server-side-rendering case): `load` is a no-op and nothing persists.
pub struct DemoSessionStore {
    storage: Option<Arc<dyn ClientStorage>>,
    state: Mutex<DemoSessionState>,
}

impl DemoSessionStore {
    pub fn with_storage(storage: Arc<dyn ClientStorage>) -> Self {
        Self {
            storage: Some(storage),
            state: Mutex::new(DemoSessionState::default()),
        }
    }

    /// Builds a store with no persisted storage attached.
    pub fn detached() -> Self {
        Self {
            storage: None,
            state: Mutex::new(DemoSessionState::default()),
        }
    }

    /// Returns the current session identifier, if one exists. No side effects.
    pub fn get(&self) -> Option<String> {
        self.lock_state().session_id.clone()
    }

    pub fn is_demo_mode(&self) -> bool {
        self.lock_state().is_demo_mode
    }

    /// Ensures a session identifier exists, generating and persisting one on
    /// first demo entry. An existing identifier is returned unchanged; this
    /// call never silently rotates it.
    pub fn init(&self) -> Result<String> {
        let mut state = self.lock_state();
        if let Some(existing) = state.session_id.clone() {
            state.is_demo_mode = true;
            return Ok(existing);
        }

        // The in-memory view may lag storage when init is the first call on
        // this store. An already-persisted identifier wins over a fresh one.
        if let Some(storage) = self.storage.as_ref() {
            if let Some(session_id) = read_persisted_session_id(storage.as_ref())? {
                state.session_id = Some(session_id.clone());
                state.is_demo_mode = true;
                return Ok(session_id);
            }
        }

        let session_id = Uuid::new_v4().to_string();
        if let Some(storage) = self.storage.as_ref() {
            storage
                .write(DEMO_SESSION_STORAGE_KEY, &session_id)
                .context("failed to persist demo session id")?;
        }
        state.session_id = Some(session_id.clone());
        state.is_demo_mode = true;
        Ok(session_id)
    }

    /// Removes the persisted identifier and marks demo mode inactive.
    /// Idempotent: clearing an absent session is not an error.
    pub fn clear(&self) -> Result<()> {
        let mut state = self.lock_state();
        if let Some(storage) = self.storage.as_ref() {
            storage
                .remove(DEMO_SESSION_STORAGE_KEY)
                .context("failed to clear demo session id")?;
        }
        state.session_id = None;
        state.is_demo_mode = false;
        Ok(())
    }

    /// Synchronizes in-memory state from persisted storage. A detached store
    /// returns immediately without error.
    pub fn load(&self) -> Result<()> {
        let Some(storage) = self.storage.as_ref() else {
            return Ok(());
        };
        let persisted = read_persisted_session_id(storage.as_ref())?;

        let mut state = self.lock_state();
        state.is_demo_mode = persisted.is_some();
        state.session_id = persisted;
        Ok(())
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, DemoSessionState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn read_persisted_session_id(storage: &dyn ClientStorage) -> Result<Option<String>> {
    Ok(storage
        .read(DEMO_SESSION_STORAGE_KEY)
        .context("failed to load demo session id")?
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

/// Returns true when `value` matches the canonical UUID-v4 textual shape:
/// 8-4-4-4-12 lowercase hex groups, version nibble `4`, variant nibble one of
/// `8`, `9`, `a`, `b`.
pub fn is_canonical_demo_session_id(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 36 {
        return false;
    }
    for (index, byte) in bytes.iter().enumerate() {
        match index {
            8 | 13 | 18 | 23 => {
                if *byte != b'-' {
                    return false;
                }
            }
            14 => {
                if *byte != b'4' {
                    return false;
                }
            }
            19 => {
                if !matches!(byte, b'8' | b'9' | b'a' | b'b') {
                    return false;
                }
            }
            _ => {
                if !byte.is_ascii_hexdigit() || byte.is_ascii_uppercase() {
                    return false;
                }
            }
        }
    }
    true
}
