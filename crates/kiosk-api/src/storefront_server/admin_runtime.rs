//! Admin check and session status handlers.

use super::*;

/// POST `/api/admin/check`. Validates the claimed Telegram user id, then
/// defers to the fail-closed authorization gate. Validation failures never
/// reach the gate; gate ambiguity (including directory failures) surfaces as
/// a denial, never as a privilege escalation or a crash.
pub(super) async fn handle_admin_check(
    State(state): State<Arc<StorefrontServerState>>,
    body: Bytes,
) -> Response {
    let payload = match serde_json::from_slice::<Value>(&body) {
        Ok(payload) => payload,
        Err(_) => return StorefrontApiError::invalid_input().into_response(),
    };
    let Some(claim) = payload.get("telegram_user_id").and_then(Value::as_str) else {
        return StorefrontApiError::invalid_input().into_response();
    };

    let decision = evaluate_admin_claim(state.admin_directory.as_ref(), claim).await;
    if decision.is_admin {
        (StatusCode::OK, Json(json!({ "isAdmin": true }))).into_response()
    } else {
        StorefrontApiError::unauthorized_admin().into_response()
    }
}

/// GET `/api/admin/session`. Reports whether a conventional session exists.
/// `telegramUserId` is populated only when the session user matches the
/// telegram-admin sentinel account; a directory failure degrades to
/// unauthenticated rather than failing the endpoint.
pub(super) async fn handle_admin_session(
    State(state): State<Arc<StorefrontServerState>>,
    headers: HeaderMap,
) -> Response {
    let Some(token) = ambient_session_token(&headers) else {
        return (StatusCode::OK, Json(json!({ "authenticated": false }))).into_response();
    };

    let user = match state.session_directory.resolve_session(&token).await {
        Ok(user) => user,
        Err(error) => {
            tracing::warn!(error = %error, "session lookup failed; treating as unauthenticated");
            None
        }
    };
    let Some(user) = user else {
        return (StatusCode::OK, Json(json!({ "authenticated": false }))).into_response();
    };

    let telegram_user_id =
        telegram_user_id_for_session(&user, &state.config.telegram_admin_email);
    (
        StatusCode::OK,
        Json(json!({
            "authenticated": true,
            "user": user,
            "telegramUserId": telegram_user_id,
        })),
    )
        .into_response()
}

/// Resolves the ambient session token from `Authorization: Bearer` or the
/// session cookie, in that order.
fn ambient_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = bearer_token_from_headers(headers) {
        return Some(token);
    }
    session_cookie_from_headers(headers)
}

fn bearer_token_from_headers(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(AUTHORIZATION)?;
    let raw = header.to_str().ok()?;
    let token = raw.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

fn session_cookie_from_headers(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let raw = header.to_str().ok()?;
    raw.split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(SESSION_COOKIE_NAME)?.strip_prefix('='))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
