//! SQLite-backed order store with opportunistic 24-hour retention.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::{StoreError, StoreResult, ORDER_RETENTION_SECONDS, USER_ORDERS_QUERY_LIMIT};

/// A persisted storefront order, scoped to one Telegram user.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OrderRecord {
    pub order_id: String,
    pub telegram_user_id: String,
    pub items: Value,
    pub total_minor_units: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Input for the order write path.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub telegram_user_id: String,
    pub items: Value,
    pub total_minor_units: i64,
}

/// Async order persistence contract consumed by the API layer.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert_order(&self, order: NewOrder) -> StoreResult<OrderRecord>;

    /// Best-effort retention sweep: deletes rows older than 24 hours as of
    /// `now` and returns how many were removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> StoreResult<usize>;

    /// Rows for one tenant, newest first, capped at 50.
    async fn list_orders_for_user(&self, telegram_user_id: &str) -> StoreResult<Vec<OrderRecord>>;
}

/// Persistent SQLite order store with per-call connections.
#[derive(Debug)]
pub struct SqliteOrderStore {
    db_path: PathBuf,
}

impl SqliteOrderStore {
    /// Creates a SQLite-backed store at `path`, creating schema if needed.
    pub fn new(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db_path = path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let store = Self { db_path };
        let connection = store.open_connection()?;
        connection.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS orders (
                order_id TEXT PRIMARY KEY,
                telegram_user_id TEXT NOT NULL,
                items_json TEXT NOT NULL,
                total_minor_units INTEGER NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_orders_user_created
                ON orders (telegram_user_id, created_at);
            "#,
        )?;
        Ok(store)
    }

    fn open_connection(&self) -> StoreResult<Connection> {
        let connection = Connection::open(&self.db_path)?;
        connection.busy_timeout(Duration::from_secs(5))?;
        connection.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            "#,
        )?;
        Ok(connection)
    }

    /// Inserts a row with an explicit creation time. Used by retention tests
    /// and backfill tooling; ordinary writes go through `insert_order`.
    pub fn insert_order_created_at(
        &self,
        order: NewOrder,
        created_at: DateTime<Utc>,
    ) -> StoreResult<OrderRecord> {
        let telegram_user_id = validated_tenant_id(&order.telegram_user_id)?;
        let record = OrderRecord {
            order_id: Uuid::new_v4().to_string(),
            telegram_user_id: telegram_user_id.to_string(),
            items: order.items,
            total_minor_units: order.total_minor_units,
            status: "created".to_string(),
            created_at,
        };

        let connection = self.open_connection()?;
        connection.execute(
            r#"
            INSERT INTO orders (
                order_id, telegram_user_id, items_json, total_minor_units, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                record.order_id,
                record.telegram_user_id,
                serde_json::to_string(&record.items)?,
                record.total_minor_units,
                record.status,
                timestamp_to_db(record.created_at),
            ],
        )?;
        Ok(record)
    }
}

#[async_trait]
impl OrderStore for SqliteOrderStore {
    async fn insert_order(&self, order: NewOrder) -> StoreResult<OrderRecord> {
        self.insert_order_created_at(order, Utc::now())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> StoreResult<usize> {
        let cutoff = now - chrono::Duration::seconds(ORDER_RETENTION_SECONDS);
        let connection = self.open_connection()?;
        let removed = connection.execute(
            "DELETE FROM orders WHERE created_at < ?1",
            params![timestamp_to_db(cutoff)],
        )?;
        Ok(removed)
    }

    async fn list_orders_for_user(&self, telegram_user_id: &str) -> StoreResult<Vec<OrderRecord>> {
        let telegram_user_id = validated_tenant_id(telegram_user_id)?;
        let connection = self.open_connection()?;
        let mut statement = connection.prepare(
            r#"
            SELECT order_id, telegram_user_id, items_json, total_minor_units, status, created_at
            FROM orders
            WHERE telegram_user_id = ?1
            ORDER BY created_at DESC
            LIMIT ?2
            "#,
        )?;
        let mut rows = statement.query(params![
            telegram_user_id,
            i64::try_from(USER_ORDERS_QUERY_LIMIT).unwrap_or(i64::MAX)
        ])?;

        let mut orders = Vec::new();
        while let Some(row) = rows.next()? {
            let items_json: String = row.get(2)?;
            let created_at: String = row.get(5)?;
            orders.push(OrderRecord {
                order_id: row.get(0)?,
                telegram_user_id: row.get(1)?,
                items: serde_json::from_str(&items_json)?,
                total_minor_units: row.get(3)?,
                status: row.get(4)?,
                created_at: timestamp_from_db(&created_at)?,
            });
        }
        Ok(orders)
    }
}

fn validated_tenant_id(telegram_user_id: &str) -> StoreResult<&str> {
    let telegram_user_id = telegram_user_id.trim();
    if telegram_user_id.is_empty() {
        return Err(StoreError::InvalidOrderField {
            field: "telegram_user_id",
            value: telegram_user_id.to_string(),
        });
    }
    Ok(telegram_user_id)
}

fn timestamp_to_db(value: DateTime<Utc>) -> String {
    value.to_rfc3339()
}

fn timestamp_from_db(value: &str) -> StoreResult<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}
