//! Shared fixtures for handler tests

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::Request;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::app::{AppState, build_router};
use storepulse_analytics::logger::SearchQueryLogger;
use storepulse_core::catalog::Product;
use storepulse_core::events::{
    EventKind, InteractionLog, KeyCount, MonthBucket, PageView, ProductView, RankDimension,
    SearchQuery, UserSession,
};
use storepulse_core::store::{CatalogStore, EventStore};
use storepulse_core::{Error, Result};
use storepulse_store_mem::{MemCatalogStore, MemEventStore};

/// Full router over fresh in-memory stores, with the stores kept reachable
/// for seeding and assertions
pub struct TestApp {
    pub router: Router,
    pub events: Arc<MemEventStore>,
    pub catalog: Arc<MemCatalogStore>,
    pub logger: SearchQueryLogger,
}

pub fn test_app() -> TestApp {
    let events = Arc::new(MemEventStore::new());
    let catalog = Arc::new(MemCatalogStore::new());
    let logger = SearchQueryLogger::new(events.clone() as Arc<dyn EventStore>);

    let state = AppState {
        events: events.clone() as Arc<dyn EventStore>,
        catalog: catalog.clone() as Arc<dyn CatalogStore>,
        search_log: logger.handle(),
    };

    TestApp {
        router: build_router(state, Duration::from_secs(5)),
        events,
        catalog,
        logger,
    }
}

/// Router over a caller-supplied event store (for failure injection)
pub fn test_app_with_events(events: Arc<dyn EventStore>) -> (Router, SearchQueryLogger) {
    let logger = SearchQueryLogger::new(events.clone());

    let state = AppState {
        events,
        catalog: Arc::new(MemCatalogStore::new()) as Arc<dyn CatalogStore>,
        search_log: logger.handle(),
    };

    (build_router(state, Duration::from_secs(5)), logger)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Catalog product created on the given January 2024 day, so higher days
/// sort newer
pub fn product(id: &str, name: &str, day: u32) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
        description: String::new(),
        brand: String::new(),
        model_number: String::new(),
        category_slug: String::new(),
        is_featured: false,
        price: 0.0,
        specifications: BTreeMap::new(),
        created_at: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
    }
}

/// Event store whose backing connection is gone; every call fails
pub struct UnreachableStore;

fn down<T>() -> Result<T> {
    Err(Error::Database("connection refused".to_string()))
}

#[async_trait]
impl EventStore for UnreachableStore {
    async fn record_page_view(&self, _event: PageView) -> Result<()> {
        down()
    }

    async fn record_product_view(&self, _event: ProductView) -> Result<()> {
        down()
    }

    async fn record_search_query(&self, _event: SearchQuery) -> Result<()> {
        down()
    }

    async fn record_interaction(&self, _event: InteractionLog) -> Result<()> {
        down()
    }

    async fn record_session(&self, _event: UserSession) -> Result<()> {
        down()
    }

    async fn event_count(&self, _kind: EventKind) -> Result<i64> {
        down()
    }

    async fn sessions_since(&self, _cutoff: DateTime<Utc>) -> Result<i64> {
        down()
    }

    async fn monthly_counts(&self, _kind: EventKind) -> Result<Vec<MonthBucket>> {
        down()
    }

    async fn ranked_counts(&self, _dimension: RankDimension, _limit: u32) -> Result<Vec<KeyCount>> {
        down()
    }

    async fn ping(&self) -> Result<()> {
        down()
    }
}

/// Event store that keeps every logged search for inspection and accepts
/// everything else as a no-op
#[derive(Default)]
pub struct SearchCapture {
    pub searches: Mutex<Vec<SearchQuery>>,
}

#[async_trait]
impl EventStore for SearchCapture {
    async fn record_page_view(&self, _event: PageView) -> Result<()> {
        Ok(())
    }

    async fn record_product_view(&self, _event: ProductView) -> Result<()> {
        Ok(())
    }

    async fn record_search_query(&self, event: SearchQuery) -> Result<()> {
        self.searches.lock().unwrap().push(event);
        Ok(())
    }

    async fn record_interaction(&self, _event: InteractionLog) -> Result<()> {
        Ok(())
    }

    async fn record_session(&self, _event: UserSession) -> Result<()> {
        Ok(())
    }

    async fn event_count(&self, _kind: EventKind) -> Result<i64> {
        Ok(0)
    }

    async fn sessions_since(&self, _cutoff: DateTime<Utc>) -> Result<i64> {
        Ok(0)
    }

    async fn monthly_counts(&self, _kind: EventKind) -> Result<Vec<MonthBucket>> {
        Ok(Vec::new())
    }

    async fn ranked_counts(&self, _dimension: RankDimension, _limit: u32) -> Result<Vec<KeyCount>> {
        Ok(Vec::new())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// Event store that accepts writes but never answers a ping in time
pub struct StalledStore;

#[async_trait]
impl EventStore for StalledStore {
    async fn record_page_view(&self, _event: PageView) -> Result<()> {
        Ok(())
    }

    async fn record_product_view(&self, _event: ProductView) -> Result<()> {
        Ok(())
    }

    async fn record_search_query(&self, _event: SearchQuery) -> Result<()> {
        Ok(())
    }

    async fn record_interaction(&self, _event: InteractionLog) -> Result<()> {
        Ok(())
    }

    async fn record_session(&self, _event: UserSession) -> Result<()> {
        Ok(())
    }

    async fn event_count(&self, _kind: EventKind) -> Result<i64> {
        Ok(0)
    }

    async fn sessions_since(&self, _cutoff: DateTime<Utc>) -> Result<i64> {
        Ok(0)
    }

    async fn monthly_counts(&self, _kind: EventKind) -> Result<Vec<MonthBucket>> {
        Ok(Vec::new())
    }

    async fn ranked_counts(&self, _dimension: RankDimension, _limit: u32) -> Result<Vec<KeyCount>> {
        Ok(Vec::new())
    }

    async fn ping(&self) -> Result<()> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(())
    }
}
