//! Typed HTTP client for the storefront API, composing both identity taggers.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use kiosk_identity::{DemoSessionStore, TelegramIdentitySource};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::request_tagging::{tag_demo_session, tag_telegram_identity};

#[derive(Debug, Clone, Deserialize)]
struct AdminCheckResponse {
    #[serde(rename = "isAdmin")]
    is_admin: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct UserOrdersResponse {
    orders: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct CreateOrderResponse {
    order: Value,
}

/// Session status reported by `GET /api/admin/session`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<Value>,
    #[serde(default, rename = "telegramUserId")]
    pub telegram_user_id: Option<String>,
}

/// Storefront API client. Every outbound request passes through the demo and
/// Telegram identity taggers; each tagger contributes its header only when
/// the backing store holds a value.
pub struct StorefrontApiClient {
    http: reqwest::Client,
    api_base: String,
    demo_session: Arc<DemoSessionStore>,
    telegram_identity: Arc<dyn TelegramIdentitySource>,
}

impl StorefrontApiClient {
    pub fn new(
        api_base: String,
        demo_session: Arc<DemoSessionStore>,
        telegram_identity: Arc<dyn TelegramIdentitySource>,
        request_timeout_ms: u64,
    ) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("kiosk-webapp"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .context("failed to create storefront api client")?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            demo_session,
            telegram_identity,
        })
    }

    /// Asks the server whether the current Telegram identity may act as an
    /// admin. Without a Telegram identity there is nothing to claim and the
    /// answer is `false` without a network round trip.
    pub async fn check_admin(&self) -> Result<bool> {
        let Some(user_id) = self.telegram_identity.current_user_id() else {
            return Ok(false);
        };

        let mut request = self
            .http
            .post(format!("{}/api/admin/check", self.api_base))
            .json(&json!({ "telegram_user_id": user_id.to_string() }))
            .build()
            .context("failed to build admin check request")?;
        self.tag_request(&mut request);

        let response = self
            .http
            .execute(request)
            .await
            .context("admin check request failed")?;
        let status = response.status();
        if status == reqwest::StatusCode::FORBIDDEN {
            return Ok(false);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!(
                "admin check failed with status {}: {}",
                status.as_u16(),
                truncate_for_error(&body, 320)
            );
        }
        let parsed: AdminCheckResponse = response
            .json()
            .await
            .context("failed to decode admin check response")?;
        Ok(parsed.is_admin)
    }

    /// Reports whether a conventional session exists for `bearer_token`.
    pub async fn session_status(&self, bearer_token: Option<&str>) -> Result<SessionStatus> {
        let mut builder = self
            .http
            .get(format!("{}/api/admin/session", self.api_base));
        if let Some(token) = bearer_token.map(str::trim).filter(|token| !token.is_empty()) {
            builder = builder.bearer_auth(token);
        }
        let mut request = builder
            .build()
            .context("failed to build session status request")?;
        self.tag_request(&mut request);

        let response = self
            .http
            .execute(request)
            .await
            .context("session status request failed")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!(
                "session status failed with status {}: {}",
                status.as_u16(),
                truncate_for_error(&body, 320)
            );
        }
        response
            .json()
            .await
            .context("failed to decode session status response")
    }

    /// Fetches the caller's orders, scoped by the current Telegram identity.
    pub async fn user_orders(&self) -> Result<Vec<Value>> {
        let mut builder = self
            .http
            .get(format!("{}/api/orders/user", self.api_base));
        if let Some(user_id) = self.telegram_identity.current_user_id() {
            builder = builder.query(&[("telegram_user_id", user_id.to_string())]);
        }
        let mut request = builder
            .build()
            .context("failed to build user orders request")?;
        self.tag_request(&mut request);

        let response = self
            .http
            .execute(request)
            .await
            .context("user orders request failed")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!(
                "user orders failed with status {}: {}",
                status.as_u16(),
                truncate_for_error(&body, 320)
            );
        }
        let parsed: UserOrdersResponse = response
            .json()
            .await
            .context("failed to decode user orders response")?;
        Ok(parsed.orders)
    }

    /// Places an order for the current Telegram identity.
    pub async fn create_order(&self, items: Value, total_minor_units: i64) -> Result<Value> {
        let Some(user_id) = self.telegram_identity.current_user_id() else {
            bail!("cannot create order without a telegram identity");
        };

        let mut request = self
            .http
            .post(format!("{}/api/orders", self.api_base))
            .json(&json!({
                "telegram_user_id": user_id.to_string(),
                "items": items,
                "total_minor_units": total_minor_units,
            }))
            .build()
            .context("failed to build create order request")?;
        self.tag_request(&mut request);

        let response = self
            .http
            .execute(request)
            .await
            .context("create order request failed")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!(
                "create order failed with status {}: {}",
                status.as_u16(),
                truncate_for_error(&body, 320)
            );
        }
        let parsed: CreateOrderResponse = response
            .json()
            .await
            .context("failed to decode create order response")?;
        Ok(parsed.order)
    }

    fn tag_request(&self, request: &mut reqwest::Request) {
        tag_demo_session(request, &self.demo_session);
        tag_telegram_identity(request, self.telegram_identity.as_ref());
    }
}

fn truncate_for_error(body: &str, max_chars: usize) -> String {
    if body.chars().count() <= max_chars {
        return body.to_string();
    }
    let truncated: String = body.chars().take(max_chars).collect();
    format!("{truncated}…")
}
