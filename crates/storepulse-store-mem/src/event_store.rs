//! EventStore trait implementation over in-process vectors

use std::collections::{BTreeMap, HashMap};

use tokio::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};

use storepulse_core::{
    Result,
    events::{
        EventKind, InteractionLog, KeyCount, MonthBucket, PageView, ProductView, RankDimension,
        SearchQuery, UserSession,
    },
    store::EventStore,
};

/// Volatile event storage, one vector per record kind
#[derive(Default)]
pub struct MemEventStore {
    page_views: RwLock<Vec<PageView>>,
    product_views: RwLock<Vec<ProductView>>,
    search_queries: RwLock<Vec<SearchQuery>>,
    interactions: RwLock<Vec<InteractionLog>>,
    sessions: RwLock<Vec<UserSession>>,
}

impl MemEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Group timestamps into ascending month-of-year buckets
fn bucket_months<I>(timestamps: I) -> Vec<MonthBucket>
where
    I: Iterator<Item = DateTime<Utc>>,
{
    let mut buckets: BTreeMap<u32, i64> = BTreeMap::new();
    for timestamp in timestamps {
        *buckets.entry(timestamp.month()).or_default() += 1;
    }

    buckets
        .into_iter()
        .map(|(month, count)| MonthBucket { month, count })
        .collect()
}

/// Count keys, order by count descending then key ascending, keep `limit`
fn rank_keys<'a, I>(keys: I, limit: u32) -> Vec<KeyCount>
where
    I: Iterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }

    let mut ranked: Vec<KeyCount> = counts
        .into_iter()
        .map(|(key, count)| KeyCount {
            key: key.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    ranked.truncate(limit as usize);
    ranked
}

#[async_trait]
impl EventStore for MemEventStore {
    async fn record_page_view(&self, event: PageView) -> Result<()> {
        self.page_views.write().await.push(event);
        Ok(())
    }

    async fn record_product_view(&self, event: ProductView) -> Result<()> {
        self.product_views.write().await.push(event);
        Ok(())
    }

    async fn record_search_query(&self, event: SearchQuery) -> Result<()> {
        self.search_queries.write().await.push(event);
        Ok(())
    }

    async fn record_interaction(&self, event: InteractionLog) -> Result<()> {
        self.interactions.write().await.push(event);
        Ok(())
    }

    async fn record_session(&self, event: UserSession) -> Result<()> {
        self.sessions.write().await.push(event);
        Ok(())
    }

    async fn event_count(&self, kind: EventKind) -> Result<i64> {
        let count = match kind {
            EventKind::PageView => self.page_views.read().await.len(),
            EventKind::ProductView => self.product_views.read().await.len(),
            EventKind::SearchQuery => self.search_queries.read().await.len(),
            EventKind::Interaction => self.interactions.read().await.len(),
            EventKind::Session => self.sessions.read().await.len(),
        };
        Ok(count as i64)
    }

    async fn sessions_since(&self, cutoff: DateTime<Utc>) -> Result<i64> {
        let count = self
            .sessions
            .read()
            .await
            .iter()
            .filter(|session| session.login_at >= cutoff)
            .count();
        Ok(count as i64)
    }

    async fn monthly_counts(&self, kind: EventKind) -> Result<Vec<MonthBucket>> {
        let buckets = match kind {
            EventKind::PageView => {
                bucket_months(self.page_views.read().await.iter().map(|e| e.timestamp))
            }
            EventKind::ProductView => bucket_months(
                self.product_views.read().await.iter().map(|e| e.timestamp),
            ),
            EventKind::SearchQuery => bucket_months(
                self.search_queries.read().await.iter().map(|e| e.timestamp),
            ),
            EventKind::Interaction => {
                bucket_months(self.interactions.read().await.iter().map(|e| e.timestamp))
            }
            EventKind::Session => {
                bucket_months(self.sessions.read().await.iter().map(|e| e.login_at))
            }
        };
        Ok(buckets)
    }

    async fn ranked_counts(&self, dimension: RankDimension, limit: u32) -> Result<Vec<KeyCount>> {
        let ranked = match dimension {
            RankDimension::ProductId => rank_keys(
                self.product_views
                    .read()
                    .await
                    .iter()
                    .map(|e| e.product_id.as_str()),
                limit,
            ),
            RankDimension::NormalizedQuery => rank_keys(
                self.search_queries
                    .read()
                    .await
                    .iter()
                    .map(|e| e.normalized_query.as_str()),
                limit,
            ),
            RankDimension::InteractionEvent => rank_keys(
                self.interactions
                    .read()
                    .await
                    .iter()
                    .map(|e| e.event.as_str()),
                limit,
            ),
            RankDimension::PagePath => rank_keys(
                self.page_views.read().await.iter().map(|e| e.path.as_str()),
                limit,
            ),
        };
        Ok(ranked)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
