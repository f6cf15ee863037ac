//! HTTP surface of the kiosk storefront: admin authorization, session
//! status, and tenant-scoped order access.

pub mod storefront_server;

pub use storefront_server::{
    build_storefront_router, run_storefront_server, ExecutionMode, StorefrontServerConfig,
    StorefrontServerState,
};
