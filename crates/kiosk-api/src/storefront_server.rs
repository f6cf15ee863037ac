//! Storefront API server wiring and shared state.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{
    header::{AUTHORIZATION, COOKIE},
    HeaderMap, StatusCode,
};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use kiosk_access::{evaluate_admin_claim, AdminDirectory};
use kiosk_store::{telegram_user_id_for_session, OrderStore, SessionDirectory};

mod admin_runtime;
mod endpoints;
mod order_runtime;
mod server_bootstrap;
mod types;

use admin_runtime::{handle_admin_check, handle_admin_session};
use endpoints::{
    ADMIN_CHECK_ENDPOINT, ADMIN_SESSION_ENDPOINT, HEALTHZ_ENDPOINT, ORDERS_ENDPOINT,
    SESSION_COOKIE_NAME, USER_ORDERS_ENDPOINT,
};
use order_runtime::{handle_create_order, handle_user_orders};
pub use server_bootstrap::{build_storefront_router, run_storefront_server};
use types::{CreateOrderRequest, StorefrontApiError, UserOrdersQuery};

/// Deployment execution mode. Development relaxes the tenant-id requirement
/// on the orders read (empty result, never data); production is the default
/// everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Production,
    Development,
}

impl ExecutionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "development" => Ok(Self::Development),
            other => bail!("invalid execution mode '{other}': expected production or development"),
        }
    }
}

/// Static configuration for one storefront server process.
#[derive(Debug, Clone)]
pub struct StorefrontServerConfig {
    pub bind: String,
    pub execution_mode: ExecutionMode,
    pub telegram_admin_email: String,
}

/// Shared per-process state. Handlers hold no mutable state of their own and
/// are safe to invoke concurrently; the stores open their own connections per
/// call.
pub struct StorefrontServerState {
    pub config: StorefrontServerConfig,
    pub admin_directory: Arc<dyn AdminDirectory>,
    pub order_store: Arc<dyn OrderStore>,
    pub session_directory: Arc<dyn SessionDirectory>,
}

impl StorefrontServerState {
    pub fn new(
        config: StorefrontServerConfig,
        admin_directory: Arc<dyn AdminDirectory>,
        order_store: Arc<dyn OrderStore>,
        session_directory: Arc<dyn SessionDirectory>,
    ) -> Self {
        Self {
            config,
            admin_directory,
            order_store,
            session_directory,
        }
    }
}
