//! Full-stack storefront tests: real SQLite stores behind the API server,
//! driven end to end through the typed client and its identity taggers.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::json;
use tokio::net::TcpListener;

use kiosk_access::SqliteAdminDirectory;
use kiosk_api::{
    build_storefront_router, ExecutionMode, StorefrontServerConfig, StorefrontServerState,
};
use kiosk_client::StorefrontApiClient;
use kiosk_identity::{
    BridgeTelegramIdentity, DemoSessionStore, FileClientStorage, FixedTelegramIdentity,
};
use kiosk_store::{
    SessionUser, SqliteOrderStore, SqliteSessionDirectory, DEFAULT_TELEGRAM_ADMIN_EMAIL,
};

struct Deployment {
    addr: SocketAddr,
    admin_directory: Arc<SqliteAdminDirectory>,
    session_directory: Arc<SqliteSessionDirectory>,
    server: tokio::task::JoinHandle<()>,
}

impl Drop for Deployment {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn deploy(state_dir: &Path) -> Result<Deployment> {
    let admin_directory = Arc::new(
        SqliteAdminDirectory::new(state_dir.join("access.sqlite"))
            .context("create admin directory")?,
    );
    let order_store = Arc::new(
        SqliteOrderStore::new(state_dir.join("orders.sqlite")).context("create order store")?,
    );
    let session_directory = Arc::new(
        SqliteSessionDirectory::new(state_dir.join("sessions.sqlite"))
            .context("create session directory")?,
    );

    let state = Arc::new(StorefrontServerState::new(
        StorefrontServerConfig {
            bind: "127.0.0.1:0".to_string(),
            execution_mode: ExecutionMode::Production,
            telegram_admin_email: DEFAULT_TELEGRAM_ADMIN_EMAIL.to_string(),
        },
        admin_directory.clone(),
        order_store,
        session_directory.clone(),
    ));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .context("bind ephemeral listener")?;
    let addr = listener.local_addr().context("resolve listener addr")?;
    let app = build_storefront_router(state);
    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    tokio::time::sleep(Duration::from_millis(20)).await;

    Ok(Deployment {
        addr,
        admin_directory,
        session_directory,
        server,
    })
}

fn client_for(
    deployment: &Deployment,
    demo_session: DemoSessionStore,
    telegram_user_id: Option<i64>,
) -> Result<StorefrontApiClient> {
    StorefrontApiClient::new(
        format!("http://{}", deployment.addr),
        Arc::new(demo_session),
        Arc::new(FixedTelegramIdentity::new(telegram_user_id)),
        5_000,
    )
}

#[tokio::test]
async fn functional_order_roundtrip_is_scoped_to_the_placing_identity() -> Result<()> {
    let tempdir = tempfile::tempdir().context("tempdir")?;
    let deployment = deploy(tempdir.path()).await?;

    let buyer = client_for(&deployment, DemoSessionStore::detached(), Some(111))?;
    let placed = buyer
        .create_order(json!([{ "sku": "latte", "quantity": 2 }]), 980)
        .await?;
    assert_eq!(placed["telegram_user_id"], json!("111"));
    assert_eq!(placed["status"], json!("created"));

    let orders = buyer.user_orders().await?;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["order_id"], placed["order_id"]);

    let bystander = client_for(&deployment, DemoSessionStore::detached(), Some(222))?;
    assert!(bystander.user_orders().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn functional_admin_check_follows_the_persisted_allowlist() -> Result<()> {
    let tempdir = tempfile::tempdir().context("tempdir")?;
    let deployment = deploy(tempdir.path()).await?;

    let client = client_for(&deployment, DemoSessionStore::detached(), Some(4242))?;
    assert!(!client.check_admin().await?);

    deployment
        .admin_directory
        .add_admin("4242")
        .context("add admin")?;
    assert!(client.check_admin().await?);

    deployment
        .admin_directory
        .remove_admin("4242")
        .context("remove admin")?;
    assert!(!client.check_admin().await?);
    Ok(())
}

#[tokio::test]
async fn functional_session_status_reports_sentinel_telegram_identity() -> Result<()> {
    let tempdir = tempfile::tempdir().context("tempdir")?;
    let deployment = deploy(tempdir.path()).await?;
    let client = client_for(&deployment, DemoSessionStore::detached(), None)?;

    let status = client.session_status(None).await?;
    assert!(!status.authenticated);

    deployment
        .session_directory
        .insert_session(
            "bot-session",
            &SessionUser {
                id: "4242".to_string(),
                email: DEFAULT_TELEGRAM_ADMIN_EMAIL.to_string(),
                display_name: Some("Kiosk Bot".to_string()),
            },
        )
        .context("insert session")?;

    let status = client.session_status(Some("bot-session")).await?;
    assert!(status.authenticated);
    assert_eq!(status.telegram_user_id.as_deref(), Some("4242"));
    Ok(())
}

#[tokio::test]
async fn functional_demo_session_survives_a_client_restart() -> Result<()> {
    let tempdir = tempfile::tempdir().context("tempdir")?;
    let deployment = deploy(tempdir.path()).await?;
    let storage_root = tempdir.path().join("client-storage");

    let first_session = {
        let storage = FileClientStorage::new(&storage_root).context("create storage")?;
        let store = DemoSessionStore::with_storage(Arc::new(storage));
        let session_id = store.init().context("init session")?;
        let client = client_for(&deployment, store, Some(111))?;
        client
            .create_order(json!([{ "sku": "espresso", "quantity": 1 }]), 320)
            .await?;
        session_id
    };

    let storage = FileClientStorage::new(&storage_root).context("reopen storage")?;
    let store = DemoSessionStore::with_storage(Arc::new(storage));
    store.load().context("load persisted session")?;
    assert_eq!(store.get(), Some(first_session));

    let client = client_for(&deployment, store, Some(111))?;
    assert_eq!(client.user_orders().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn functional_live_identity_bridge_drives_tenant_scoping() -> Result<()> {
    let tempdir = tempfile::tempdir().context("tempdir")?;
    let deployment = deploy(tempdir.path()).await?;

    let bridge = Arc::new(BridgeTelegramIdentity::new());
    let client = StorefrontApiClient::new(
        format!("http://{}", deployment.addr),
        Arc::new(DemoSessionStore::detached()),
        bridge.clone(),
        5_000,
    )?;

    // Without an identity the production server requires the tenant id.
    assert!(client.user_orders().await.is_err());

    bridge.set_user_id(Some(555));
    client
        .create_order(json!([{ "sku": "flat-white", "quantity": 1 }]), 450)
        .await?;
    assert_eq!(client.user_orders().await?.len(), 1);

    bridge.set_user_id(Some(556));
    assert!(client.user_orders().await?.is_empty());
    Ok(())
}
