//! Shared endpoint and header constant definitions for the storefront API.

pub(super) const ADMIN_CHECK_ENDPOINT: &str = "/api/admin/check";
pub(super) const ADMIN_SESSION_ENDPOINT: &str = "/api/admin/session";
pub(super) const USER_ORDERS_ENDPOINT: &str = "/api/orders/user";
pub(super) const ORDERS_ENDPOINT: &str = "/api/orders";
pub(super) const HEALTHZ_ENDPOINT: &str = "/healthz";
pub(super) const SESSION_COOKIE_NAME: &str = "kiosk_session";
