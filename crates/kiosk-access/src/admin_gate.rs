//! Fail-closed evaluation of claimed Telegram admin identities.

use crate::admin_directory::AdminDirectory;

const MAX_CLAIM_DIGITS: usize = 20;

/// Per-request authorization outcome. Never cached beyond the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminDecision {
    pub telegram_user_id: String,
    pub is_admin: bool,
}

impl AdminDecision {
    fn deny(telegram_user_id: impl Into<String>) -> Self {
        Self {
            telegram_user_id: telegram_user_id.into(),
            is_admin: false,
        }
    }
}

/// Normalizes a claimed Telegram user id: trims whitespace and accepts only
/// 1..=20 ASCII digits. Anything else is rejected before the directory is
/// consulted.
pub fn normalize_admin_claim(raw: &str) -> Option<String> {
    let claim = raw.trim();
    if claim.is_empty() || claim.len() > MAX_CLAIM_DIGITS {
        return None;
    }
    if !claim.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    Some(claim.to_string())
}

/// Decides whether the claimed identity may perform admin actions.
///
/// Fail-closed: malformed claims, missing records, and directory errors all
/// resolve to a denial. The call never returns an error or panics past its
/// boundary, and every decision is logged with the claimed identifier.
pub async fn evaluate_admin_claim(
    directory: &dyn AdminDirectory,
    claimed_telegram_user_id: &str,
) -> AdminDecision {
    let Some(claim) = normalize_admin_claim(claimed_telegram_user_id) else {
        tracing::warn!(
            telegram_user_id = claimed_telegram_user_id.trim(),
            "admin claim denied: malformed telegram user id"
        );
        return AdminDecision::deny(claimed_telegram_user_id.trim());
    };

    match directory.has_admin(&claim).await {
        Ok(is_admin) => {
            if is_admin {
                tracing::info!(telegram_user_id = %claim, "admin claim allowed");
            } else {
                tracing::info!(telegram_user_id = %claim, "admin claim denied: not on allow-list");
            }
            AdminDecision {
                telegram_user_id: claim,
                is_admin,
            }
        }
        Err(error) => {
            tracing::warn!(
                telegram_user_id = %claim,
                error = %error,
                "admin claim denied: allow-list lookup failed"
            );
            AdminDecision::deny(claim)
        }
    }
}
