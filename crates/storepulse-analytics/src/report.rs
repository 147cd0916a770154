//! Report assembly
//!
//! Four report shapes behind a closed kind enum. Each kind is an independent
//! set of store reads; assembling one never requires another, so concurrent
//! report requests are free to interleave.

use std::str::FromStr;

use chrono::{Duration, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::aggregate::{self, MonthlyCount, RankedProduct, SearchCount};
use crate::trend;
use storepulse_core::Result;
use storepulse_core::events::EventKind;
use storepulse_core::store::{CatalogStore, EventStore};

/// The closed set of report discriminators accepted on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Overview,
    PopularProducts,
    TopSearches,
    MonthlyViews,
}

/// Rejected report discriminator; surfaces as a client error, never a
/// default report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown report type: {0}")]
pub struct UnknownReportKind(pub String);

impl FromStr for ReportKind {
    type Err = UnknownReportKind;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "overview" => Ok(ReportKind::Overview),
            "popular-products" => Ok(ReportKind::PopularProducts),
            "top-searches" => Ok(ReportKind::TopSearches),
            "monthly-views" => Ok(ReportKind::MonthlyViews),
            other => Err(UnknownReportKind(other.to_string())),
        }
    }
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Overview => "overview",
            ReportKind::PopularProducts => "popular-products",
            ReportKind::TopSearches => "top-searches",
            ReportKind::MonthlyViews => "monthly-views",
        }
    }
}

/// Flat counters across all five record kinds plus session trend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewReport {
    pub page_views: i64,
    pub product_views: i64,
    pub search_queries: i64,
    pub interactions: i64,
    pub sessions: i64,

    /// Login sessions in the trailing 30 days
    pub active_sessions: i64,

    /// Login sessions in the trailing 24 hours
    pub daily_active_sessions: i64,

    /// Daily actives against the implied monthly average
    pub session_growth: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularProductsReport {
    pub products: Vec<RankedProduct>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSearchesReport {
    pub searches: Vec<SearchCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyViewsReport {
    /// Sparse month-of-year series for page views
    pub series: Vec<MonthlyCount>,

    /// Growth between the last two months present in the series
    pub growth_percent: i64,
}

/// Assembled report data, serialized without an outer tag so the HTTP layer
/// can embed it directly as the response `data` field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Overview(OverviewReport),
    PopularProducts(PopularProductsReport),
    TopSearches(TopSearchesReport),
    MonthlyViews(MonthlyViewsReport),
}

/// Build one report from the injected store handles
pub async fn assemble(
    kind: ReportKind,
    events: &dyn EventStore,
    catalog: &dyn CatalogStore,
) -> Result<Report> {
    match kind {
        ReportKind::Overview => Ok(Report::Overview(overview(events).await?)),
        ReportKind::PopularProducts => Ok(Report::PopularProducts(PopularProductsReport {
            products: aggregate::popular_products(events, catalog).await?,
        })),
        ReportKind::TopSearches => Ok(Report::TopSearches(TopSearchesReport {
            searches: aggregate::top_searches(events).await?,
        })),
        ReportKind::MonthlyViews => {
            let series = aggregate::monthly_series(events, EventKind::PageView).await?;
            let growth_percent = trend::month_over_month_growth(&series);
            Ok(Report::MonthlyViews(MonthlyViewsReport {
                series,
                growth_percent,
            }))
        }
    }
}

async fn overview(events: &dyn EventStore) -> Result<OverviewReport> {
    let page_views = events.event_count(EventKind::PageView).await?;
    let product_views = events.event_count(EventKind::ProductView).await?;
    let search_queries = events.event_count(EventKind::SearchQuery).await?;
    let interactions = events.event_count(EventKind::Interaction).await?;
    let sessions = events.event_count(EventKind::Session).await?;

    let now = Utc::now();
    let active_sessions = events.sessions_since(now - Duration::days(30)).await?;
    let daily_active_sessions = events.sessions_since(now - Duration::hours(24)).await?;
    let session_growth = trend::active_user_growth(daily_active_sessions, active_sessions);

    Ok(OverviewReport {
        page_views,
        product_views,
        search_queries,
        interactions,
        sessions,
        active_sessions,
        daily_active_sessions,
        session_growth,
    })
}
