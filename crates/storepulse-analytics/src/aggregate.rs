//! Time-bucketed and Top-N aggregation
//!
//! The grouping and counting itself happens inside the store (one grouped
//! read per call); this module owns the report-facing shaping: month-index
//! to month-name mapping, the Top-N limits, and the rank-preserving
//! denormalization of product ids.

use std::collections::HashMap;

use serde::Serialize;
use storepulse_core::Result;
use storepulse_core::events::{EventKind, RankDimension};
use storepulse_core::store::{CatalogStore, EventStore};

/// Ranked search queries kept per report
pub const TOP_SEARCH_LIMIT: u32 = 8;

/// Ranked products kept per report
pub const POPULAR_PRODUCT_LIMIT: u32 = 10;

/// Fixed month-name table; bucket index 1 maps to `MONTH_NAMES[0]`
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One month of a view series, keyed by English month name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCount {
    pub month: String,
    pub views: i64,
}

/// One entry of the top-searches ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCount {
    pub query: String,
    pub count: i64,
}

/// One entry of the popular-products ranking, denormalized for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedProduct {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub brand: String,
    pub views: i64,
}

/// English name for a 1-indexed calendar month
pub fn month_name(month: u32) -> Option<&'static str> {
    let index = month.checked_sub(1)? as usize;
    MONTH_NAMES.get(index).copied()
}

/// Per-calendar-month view counts for one event kind, ascending by month.
///
/// The series is sparse: months with no records do not appear. Consumers
/// that chart dense months zero-fill on their side.
pub async fn monthly_series(
    store: &dyn EventStore,
    kind: EventKind,
) -> Result<Vec<MonthlyCount>> {
    let buckets = store.monthly_counts(kind).await?;

    let series = buckets
        .into_iter()
        .filter_map(|bucket| {
            month_name(bucket.month).map(|name| MonthlyCount {
                month: name.to_string(),
                views: bucket.count,
            })
        })
        .collect();

    Ok(series)
}

/// Most frequent normalized search queries, count descending
pub async fn top_searches(store: &dyn EventStore) -> Result<Vec<SearchCount>> {
    let ranked = store
        .ranked_counts(RankDimension::NormalizedQuery, TOP_SEARCH_LIMIT)
        .await?;

    Ok(ranked
        .into_iter()
        .map(|entry| SearchCount {
            query: entry.key,
            count: entry.count,
        })
        .collect())
}

/// Most viewed products with catalog fields attached.
///
/// Ranks by product id first, then resolves the bounded id set in a single
/// lookup. The lookup makes no ordering promise, so counts are re-attached
/// in rank order. Ranked ids missing from the catalog are omitted from the
/// result rather than failing the report.
pub async fn popular_products(
    events: &dyn EventStore,
    catalog: &dyn CatalogStore,
) -> Result<Vec<RankedProduct>> {
    let ranked = events
        .ranked_counts(RankDimension::ProductId, POPULAR_PRODUCT_LIMIT)
        .await?;

    if ranked.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<String> = ranked.iter().map(|entry| entry.key.clone()).collect();
    let products = catalog.products_by_ids(&ids).await?;

    let mut by_id: HashMap<String, storepulse_core::catalog::Product> = products
        .into_iter()
        .map(|product| (product.id.clone(), product))
        .collect();

    let list = ranked
        .into_iter()
        .filter_map(|entry| match by_id.remove(&entry.key) {
            Some(product) => Some(RankedProduct {
                id: product.id,
                name: product.name,
                slug: product.slug,
                brand: product.brand,
                views: entry.count,
            }),
            None => {
                tracing::warn!(
                    product_id = %entry.key,
                    "Ranked product missing from catalog, omitting"
                );
                None
            }
        })
        .collect();

    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockCatalog, MockEvents, test_product};
    use storepulse_core::events::KeyCount;
    use storepulse_core::events::MonthBucket;

    #[test]
    fn test_month_name_mapping() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(3), Some("March"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    #[tokio::test]
    async fn test_monthly_series_maps_sparse_buckets() {
        let mut events = MockEvents::new();
        events
            .expect_monthly_counts()
            .returning(|_| Ok(vec![
                MonthBucket { month: 3, count: 3 },
                MonthBucket { month: 7, count: 2 },
            ]));

        let series = monthly_series(&events, EventKind::PageView).await.unwrap();
        assert_eq!(
            series,
            vec![
                MonthlyCount {
                    month: "March".to_string(),
                    views: 3
                },
                MonthlyCount {
                    month: "July".to_string(),
                    views: 2
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_top_searches_uses_fixed_limit() {
        let mut events = MockEvents::new();
        events
            .expect_ranked_counts()
            .withf(|dimension, limit| {
                *dimension == RankDimension::NormalizedQuery && *limit == TOP_SEARCH_LIMIT
            })
            .returning(|_, _| Ok(vec![
                KeyCount {
                    key: "plc".to_string(),
                    count: 3,
                },
                KeyCount {
                    key: "inverter".to_string(),
                    count: 2,
                },
            ]));

        let searches = top_searches(&events).await.unwrap();
        assert_eq!(searches[0].query, "plc");
        assert_eq!(searches[0].count, 3);
        assert_eq!(searches[1].query, "inverter");
        assert_eq!(searches[1].count, 2);
    }

    #[tokio::test]
    async fn test_popular_products_preserves_rank_order() {
        let mut events = MockEvents::new();
        events.expect_ranked_counts().returning(|_, _| {
            Ok(vec![
                KeyCount {
                    key: "p2".to_string(),
                    count: 5,
                },
                KeyCount {
                    key: "p1".to_string(),
                    count: 3,
                },
            ])
        });

        let mut catalog = MockCatalog::new();
        // Lookup returns ids in a different order than the ranking
        catalog
            .expect_products_by_ids()
            .returning(|_| Ok(vec![test_product("p1", "Alpha"), test_product("p2", "Beta")]));

        let products = popular_products(&events, &catalog).await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, "p2");
        assert_eq!(products[0].views, 5);
        assert_eq!(products[1].id, "p1");
        assert_eq!(products[1].views, 3);
    }

    #[tokio::test]
    async fn test_popular_products_omits_missing_entities() {
        let mut events = MockEvents::new();
        events.expect_ranked_counts().returning(|_, _| {
            Ok(vec![
                KeyCount {
                    key: "p2".to_string(),
                    count: 5,
                },
                KeyCount {
                    key: "ghost".to_string(),
                    count: 4,
                },
                KeyCount {
                    key: "p1".to_string(),
                    count: 3,
                },
            ])
        });

        let mut catalog = MockCatalog::new();
        catalog
            .expect_products_by_ids()
            .returning(|_| Ok(vec![test_product("p1", "Alpha"), test_product("p2", "Beta")]));

        let products = popular_products(&events, &catalog).await.unwrap();
        let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p1"]);
    }

    #[tokio::test]
    async fn test_popular_products_empty_ranking_skips_lookup() {
        let mut events = MockEvents::new();
        events.expect_ranked_counts().returning(|_, _| Ok(Vec::new()));

        // No products_by_ids expectation: a call would panic the test
        let catalog = MockCatalog::new();

        let products = popular_products(&events, &catalog).await.unwrap();
        assert!(products.is_empty());
    }
}
