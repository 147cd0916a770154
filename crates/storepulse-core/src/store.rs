//! Store traits for events and the catalog
//!
//! `EventStore` abstracts the append-only event collections plus the grouped
//! reads the aggregation layer runs over them. `CatalogStore` abstracts the
//! read-only product lookups behind catalog search.
//!
//! Implementations:
//! - `SqliteEventStore` / `SqliteCatalogStore` (storepulse-store-sqlite)
//! - `MemEventStore` / `MemCatalogStore` (storepulse-store-mem)

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::Result;
use crate::catalog::{CatalogQuery, Product, ProductPage};
use crate::events::{
    EventKind, InteractionLog, KeyCount, MonthBucket, PageView, ProductView, RankDimension,
    SearchQuery, UserSession,
};

/// Append-only event storage with grouped read primitives
///
/// Writes are single-record and atomic: one record is either fully written
/// or not at all. No multi-record transactions exist anywhere in the engine.
///
/// # Errors
/// All methods surface store problems as `Error::EventStore` or
/// `Error::Database`; callers decide whether a failure is fatal (reports)
/// or discardable (search logging).
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Append one page view record
    async fn record_page_view(&self, event: PageView) -> Result<()>;

    /// Append one product view record
    async fn record_product_view(&self, event: ProductView) -> Result<()>;

    /// Append one search query record
    async fn record_search_query(&self, event: SearchQuery) -> Result<()>;

    /// Append one interaction record
    async fn record_interaction(&self, event: InteractionLog) -> Result<()>;

    /// Append one login session record
    async fn record_session(&self, event: UserSession) -> Result<()>;

    /// Total number of records of one kind
    async fn event_count(&self, kind: EventKind) -> Result<i64>;

    /// Number of login sessions at or after `cutoff`.
    ///
    /// Counts session records, not distinct users.
    async fn sessions_since(&self, cutoff: DateTime<Utc>) -> Result<i64>;

    /// Per-calendar-month record counts for one kind.
    ///
    /// Buckets are month-of-year (1-12) across all years, ascending by
    /// month index. Months with no records are omitted from the result.
    async fn monthly_counts(&self, kind: EventKind) -> Result<Vec<MonthBucket>>;

    /// Top `limit` grouping keys of one ranking dimension.
    ///
    /// Ordered by count descending, then key ascending so equal counts rank
    /// deterministically.
    async fn ranked_counts(&self, dimension: RankDimension, limit: u32) -> Result<Vec<KeyCount>>;

    /// Cheap connectivity probe for readiness checks
    async fn ping(&self) -> Result<()>;
}

/// Read-only catalog lookups
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Run a sanitized catalog query, returning one page plus totals
    async fn search_products(&self, query: &CatalogQuery) -> Result<ProductPage>;

    /// Fetch products by id in one bounded lookup.
    ///
    /// Unknown ids are skipped. Result order is unspecified; callers that
    /// care about order re-sort by id on their side.
    async fn products_by_ids(&self, ids: &[String]) -> Result<Vec<Product>>;

    /// Resolve a category id to its slug. Unknown ids resolve to `None`,
    /// never an error.
    async fn resolve_category_slug(&self, id: &str) -> Result<Option<String>>;
}
