//! Tenant-scoped order read and the order write path.

use super::*;

/// GET `/api/orders/user`. Runs the best-effort retention purge first; the
/// delete and the select are independent statements, so a purge failure is
/// logged and does not abort the read.
pub(super) async fn handle_user_orders(
    State(state): State<Arc<StorefrontServerState>>,
    Query(query): Query<UserOrdersQuery>,
) -> Response {
    if let Err(error) = state.order_store.purge_expired(Utc::now()).await {
        tracing::warn!(error = %error, "order retention purge failed; continuing with read");
    }

    let tenant = query
        .telegram_user_id
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty());
    let Some(tenant) = tenant else {
        return match state.config.execution_mode {
            ExecutionMode::Development => {
                (StatusCode::OK, Json(json!({ "orders": [] }))).into_response()
            }
            ExecutionMode::Production => StorefrontApiError::tenant_required().into_response(),
        };
    };

    match state.order_store.list_orders_for_user(tenant).await {
        Ok(orders) => (StatusCode::OK, Json(json!({ "orders": orders }))).into_response(),
        Err(error) => {
            tracing::error!(error = %error, telegram_user_id = tenant, "user orders query failed");
            StorefrontApiError::internal().into_response()
        }
    }
}

/// POST `/api/orders`. The write path behind the tenant-scoped read.
pub(super) async fn handle_create_order(
    State(state): State<Arc<StorefrontServerState>>,
    body: Bytes,
) -> Response {
    let request = match serde_json::from_slice::<CreateOrderRequest>(&body) {
        Ok(request) => request,
        Err(_) => return StorefrontApiError::invalid_input().into_response(),
    };
    if request.telegram_user_id.trim().is_empty() || request.total_minor_units < 0 {
        return StorefrontApiError::invalid_input().into_response();
    }

    let new_order = kiosk_store::NewOrder {
        telegram_user_id: request.telegram_user_id,
        items: request.items,
        total_minor_units: request.total_minor_units,
    };
    match state.order_store.insert_order(new_order).await {
        Ok(order) => (StatusCode::OK, Json(json!({ "order": order }))).into_response(),
        Err(kiosk_store::StoreError::InvalidOrderField { .. }) => {
            StorefrontApiError::invalid_input().into_response()
        }
        Err(error) => {
            tracing::error!(error = %error, "order insert failed");
            StorefrontApiError::internal().into_response()
        }
    }
}
