//! Catalog search endpoint
//!
//! `GET /api/products` takes untrusted storefront query parameters, shapes
//! them through the sanitizer, and answers with one page of products. A
//! first-page search additionally feeds the popularity ranking through the
//! fire-and-forget search log.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Map;

use storepulse_analytics::sanitize::{
    build_catalog_filter, is_object_id, normalize_search_query, validate_sort_expression,
};
use storepulse_core::catalog::{CatalogQuery, Product, SortSpec};
use storepulse_core::events::SearchQuery;

use crate::app::AppState;
use crate::error::ApiError;

/// Caller-supplied query parameters, all optional
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogParams {
    #[serde(default)]
    pub search: String,

    #[serde(default = "default_page")]
    pub page: u32,

    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Category slug, or a 24-hex category id to resolve
    pub category: Option<String>,

    pub model_number: Option<String>,

    /// Only the literal "true" enables the featured filter
    pub is_featured: Option<String>,

    pub sort: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub success: bool,
    pub total: u64,
    pub page: u32,
    pub pages: u64,
    pub items: Vec<Product>,
}

pub async fn search_products(
    State(state): State<AppState>,
    params: Result<Query<CatalogParams>, QueryRejection>,
) -> Result<Json<CatalogResponse>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    if params.page < 1 {
        return Err(ApiError::BadRequest("page must be at least 1".to_string()));
    }
    if !(1..=100).contains(&params.limit) {
        return Err(ApiError::BadRequest(
            "limit must be between 1 and 100".to_string(),
        ));
    }

    let category_slug = match params.category.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => {
            if is_object_id(raw) {
                // An id that resolves to no category drops the constraint
                // rather than matching nothing
                state.catalog.resolve_category_slug(raw).await?
            } else {
                Some(raw.to_string())
            }
        }
        _ => None,
    };

    let featured_only = params.is_featured.as_deref() == Some("true");

    let filter = build_catalog_filter(
        &params.search,
        category_slug.as_deref(),
        params.model_number.as_deref(),
        featured_only,
    );
    let sort = SortSpec::parse(&validate_sort_expression(
        params.sort.as_deref().unwrap_or_default(),
    ));

    let query = CatalogQuery {
        filter,
        sort,
        page: params.page,
        limit: params.limit,
    };
    let result = state.catalog.search_products(&query).await?;

    // Only first-page searches feed the ranking; deeper pages of the same
    // search are not logged again
    let trimmed = params.search.trim();
    if params.page == 1 && !trimmed.is_empty() {
        state.search_log.log(SearchQuery {
            raw_query: trimmed.to_string(),
            normalized_query: normalize_search_query(trimmed),
            total_results: result.total as i64,
            source: "products".to_string(),
            user_id: None,
            meta: Map::new(),
            timestamp: Utc::now(),
        });
    }

    Ok(Json(CatalogResponse {
        success: true,
        total: result.total,
        page: result.page,
        pages: result.pages,
        items: result.items,
    }))
}
