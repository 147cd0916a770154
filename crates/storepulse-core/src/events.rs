//! Behavioral event records
//!
//! All five record kinds are write-once: the engine appends them and reads
//! them back in aggregate. Nothing here is ever updated or deleted by the
//! engine (retention is an external concern).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A storefront page render
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub path: String,
    pub timestamp: DateTime<Utc>,
}

/// A product detail render
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub product_id: String,
    pub timestamp: DateTime<Utc>,
}

/// A logged free-text search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// The submitted search text, trimmed of surrounding whitespace.
    /// Case and inner spacing are preserved.
    pub raw_query: String,

    /// Grouping key for popularity ranking. Invariant: lowercase, trimmed,
    /// internal whitespace collapsed to single spaces.
    pub normalized_query: String,

    /// Result count the triggering lookup returned
    pub total_results: i64,

    /// Originating surface ("products" for catalog lookups)
    pub source: String,

    #[serde(default)]
    pub user_id: Option<String>,

    #[serde(default)]
    pub meta: Map<String, Value>,

    pub timestamp: DateTime<Utc>,
}

/// An arbitrary UI interaction. `event` is an opaque ranking key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionLog {
    pub event: String,

    #[serde(default)]
    pub meta: Map<String, Value>,

    pub timestamp: DateTime<Utc>,
}

/// A login session record.
///
/// Windowed activity counts are session counts, not unique-user counts: a
/// user logging in twice inside the window counts twice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub user_id: String,
    pub login_at: DateTime<Utc>,
}

/// Discriminates the five record collections for counting queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    PageView,
    ProductView,
    SearchQuery,
    Interaction,
    Session,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::PageView => "page-view",
            EventKind::ProductView => "product-view",
            EventKind::SearchQuery => "search-query",
            EventKind::Interaction => "interaction",
            EventKind::Session => "session",
        }
    }
}

/// Grouping keys for Top-N ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankDimension {
    /// `ProductView::product_id`
    ProductId,
    /// `SearchQuery::normalized_query`
    NormalizedQuery,
    /// `InteractionLog::event`
    InteractionEvent,
    /// `PageView::path`
    PagePath,
}

/// One calendar-month bucket of a grouped count (1 = January).
///
/// Buckets are month-of-year across all years, not a rolling window: a
/// record from March 2024 and one from March 2025 land in the same bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub month: u32,
    pub count: i64,
}

/// One ranked key with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCount {
    pub key: String,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_wire_names() {
        let record = SearchQuery {
            raw_query: "S7-1200".to_string(),
            normalized_query: "s7-1200".to_string(),
            total_results: 4,
            source: "products".to_string(),
            user_id: None,
            meta: Map::new(),
            timestamp: Utc::now(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["rawQuery"], "S7-1200");
        assert_eq!(json["normalizedQuery"], "s7-1200");
        assert_eq!(json["totalResults"], 4);
        assert!(json.get("raw_query").is_none());
    }

    #[test]
    fn test_user_session_wire_names() {
        let record = UserSession {
            user_id: "u-1".to_string(),
            login_at: Utc::now(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["userId"], "u-1");
        assert!(json.get("loginAt").is_some());
    }

    #[test]
    fn test_event_kind_labels() {
        assert_eq!(EventKind::PageView.as_str(), "page-view");
        assert_eq!(EventKind::Session.as_str(), "session");
    }
}
