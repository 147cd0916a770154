//! Shared mocks for analytics tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use std::collections::BTreeMap;

use storepulse_core::Result;
use storepulse_core::catalog::{CatalogQuery, Product, ProductPage};
use storepulse_core::events::{
    EventKind, InteractionLog, KeyCount, MonthBucket, PageView, ProductView, RankDimension,
    SearchQuery, UserSession,
};
use storepulse_core::store::{CatalogStore, EventStore};

mock! {
    pub Events {}

    #[async_trait]
    impl EventStore for Events {
        async fn record_page_view(&self, event: PageView) -> Result<()>;
        async fn record_product_view(&self, event: ProductView) -> Result<()>;
        async fn record_search_query(&self, event: SearchQuery) -> Result<()>;
        async fn record_interaction(&self, event: InteractionLog) -> Result<()>;
        async fn record_session(&self, event: UserSession) -> Result<()>;
        async fn event_count(&self, kind: EventKind) -> Result<i64>;
        async fn sessions_since(&self, cutoff: DateTime<Utc>) -> Result<i64>;
        async fn monthly_counts(&self, kind: EventKind) -> Result<Vec<MonthBucket>>;
        async fn ranked_counts(&self, dimension: RankDimension, limit: u32) -> Result<Vec<KeyCount>>;
        async fn ping(&self) -> Result<()>;
    }
}

mock! {
    pub Catalog {}

    #[async_trait]
    impl CatalogStore for Catalog {
        async fn search_products(&self, query: &CatalogQuery) -> Result<ProductPage>;
        async fn products_by_ids(&self, ids: &[String]) -> Result<Vec<Product>>;
        async fn resolve_category_slug(&self, id: &str) -> Result<Option<String>>;
    }
}

pub fn test_product(id: &str, name: &str) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
        description: String::new(),
        brand: "Acme".to_string(),
        model_number: String::new(),
        category_slug: String::new(),
        is_featured: false,
        price: 0.0,
        specifications: BTreeMap::new(),
        created_at: Utc::now(),
    }
}
