//! EventStore trait implementation over SQLite

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqlitePool;

use storepulse_core::{
    Result,
    events::{
        EventKind, InteractionLog, KeyCount, MonthBucket, PageView, ProductView, RankDimension,
        SearchQuery, UserSession,
    },
    store::EventStore,
};

use crate::db_err;

/// Append-only event storage backed by the shared analytics pool
#[derive(Clone)]
pub struct SqliteEventStore {
    pool: SqlitePool,
}

impl SqliteEventStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Table and timestamp column for one record kind
fn kind_source(kind: EventKind) -> (&'static str, &'static str) {
    match kind {
        EventKind::PageView => ("page_views", "occurred_at"),
        EventKind::ProductView => ("product_views", "occurred_at"),
        EventKind::SearchQuery => ("search_queries", "occurred_at"),
        EventKind::Interaction => ("interaction_logs", "occurred_at"),
        EventKind::Session => ("user_sessions", "login_at"),
    }
}

/// Table and grouping column for one ranking dimension
fn dimension_source(dimension: RankDimension) -> (&'static str, &'static str) {
    match dimension {
        RankDimension::ProductId => ("product_views", "product_id"),
        RankDimension::NormalizedQuery => ("search_queries", "normalized_query"),
        RankDimension::InteractionEvent => ("interaction_logs", "event"),
        RankDimension::PagePath => ("page_views", "path"),
    }
}

#[async_trait]
impl EventStore for SqliteEventStore {
    async fn record_page_view(&self, event: PageView) -> Result<()> {
        sqlx::query("INSERT INTO page_views (path, occurred_at) VALUES (?, ?)")
            .bind(&event.path)
            .bind(event.timestamp)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn record_product_view(&self, event: ProductView) -> Result<()> {
        sqlx::query("INSERT INTO product_views (product_id, occurred_at) VALUES (?, ?)")
            .bind(&event.product_id)
            .bind(event.timestamp)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn record_search_query(&self, event: SearchQuery) -> Result<()> {
        let meta = serde_json::to_string(&event.meta)?;
        sqlx::query(
            r#"
            INSERT INTO search_queries
                (raw_query, normalized_query, total_results, source, user_id, meta, occurred_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.raw_query)
        .bind(&event.normalized_query)
        .bind(event.total_results)
        .bind(&event.source)
        .bind(&event.user_id)
        .bind(meta)
        .bind(event.timestamp)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn record_interaction(&self, event: InteractionLog) -> Result<()> {
        let meta = serde_json::to_string(&event.meta)?;
        sqlx::query("INSERT INTO interaction_logs (event, meta, occurred_at) VALUES (?, ?, ?)")
            .bind(&event.event)
            .bind(meta)
            .bind(event.timestamp)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn record_session(&self, event: UserSession) -> Result<()> {
        sqlx::query("INSERT INTO user_sessions (user_id, login_at) VALUES (?, ?)")
            .bind(&event.user_id)
            .bind(event.login_at)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn event_count(&self, kind: EventKind) -> Result<i64> {
        let (table, _) = kind_source(kind);
        let query = format!("SELECT COUNT(*) FROM {}", table);

        sqlx::query_scalar(&query)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)
    }

    async fn sessions_since(&self, cutoff: DateTime<Utc>) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM user_sessions WHERE login_at >= ?")
            .bind(cutoff)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)
    }

    async fn monthly_counts(&self, kind: EventKind) -> Result<Vec<MonthBucket>> {
        let (table, ts_column) = kind_source(kind);
        let query = format!(
            r#"
            SELECT CAST(strftime('%m', {}) AS INTEGER) AS month, COUNT(*) AS total
            FROM {}
            GROUP BY month
            ORDER BY month ASC
            "#,
            ts_column, table
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| MonthBucket {
                month: row.try_get::<i64, _>("month").unwrap_or(0) as u32,
                count: row.try_get::<i64, _>("total").unwrap_or(0),
            })
            .collect())
    }

    async fn ranked_counts(&self, dimension: RankDimension, limit: u32) -> Result<Vec<KeyCount>> {
        let (table, key_column) = dimension_source(dimension);
        let query = format!(
            r#"
            SELECT {} AS key, COUNT(*) AS total
            FROM {}
            GROUP BY key
            ORDER BY total DESC, key ASC
            LIMIT ?
            "#,
            key_column, table
        );

        let rows = sqlx::query(&query)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| KeyCount {
                key: row.try_get::<String, _>("key").unwrap_or_default(),
                count: row.try_get::<i64, _>("total").unwrap_or(0),
            })
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
