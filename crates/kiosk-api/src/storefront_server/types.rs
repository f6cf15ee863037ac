//! Request/response/error types shared across storefront handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

/// Error payload mapped to the storefront JSON envelope. Every failure body
/// carries an `error` field and no internal detail.
#[derive(Debug)]
pub(super) struct StorefrontApiError {
    pub(super) status: StatusCode,
    pub(super) body: Value,
}

impl StorefrontApiError {
    pub(super) fn invalid_input() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: json!({ "error": "Invalid input" }),
        }
    }

    pub(super) fn tenant_required() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: json!({ "error": "telegram_user_id required" }),
        }
    }

    pub(super) fn unauthorized_admin() -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            body: json!({ "error": "Unauthorized", "isAdmin": false }),
        }
    }

    pub(super) fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: json!({ "error": "Internal server error" }),
        }
    }
}

impl IntoResponse for StorefrontApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Debug, Deserialize, Default)]
pub(super) struct UserOrdersQuery {
    #[serde(default)]
    pub(super) telegram_user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateOrderRequest {
    pub(super) telegram_user_id: String,
    pub(super) items: Value,
    pub(super) total_minor_units: i64,
}
