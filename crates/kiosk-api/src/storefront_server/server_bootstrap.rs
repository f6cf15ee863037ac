//! Storefront server bootstrap and router wiring.

use super::*;

/// Binds the configured address and serves the storefront API until ctrl-c.
pub async fn run_storefront_server(state: Arc<StorefrontServerState>) -> Result<()> {
    let bind_addr = state
        .config
        .bind
        .parse::<SocketAddr>()
        .with_context(|| format!("invalid --bind '{}'", state.config.bind))?;

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind storefront server on {bind_addr}"))?;
    let local_addr = listener
        .local_addr()
        .context("failed to resolve bound storefront server address")?;
    tracing::info!(
        addr = %local_addr,
        execution_mode = state.config.execution_mode.as_str(),
        "storefront api listening"
    );

    let app = build_storefront_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("storefront server exited unexpectedly")?;
    Ok(())
}

pub fn build_storefront_router(state: Arc<StorefrontServerState>) -> Router {
    Router::new()
        .route(ADMIN_CHECK_ENDPOINT, post(handle_admin_check))
        .route(ADMIN_SESSION_ENDPOINT, get(handle_admin_session))
        .route(USER_ORDERS_ENDPOINT, get(handle_user_orders))
        .route(ORDERS_ENDPOINT, post(handle_create_order))
        .route(HEALTHZ_ENDPOINT, get(handle_healthz))
        .with_state(state)
}

async fn handle_healthz() -> Response {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}
