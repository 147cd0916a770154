//! Reporting endpoint
//!
//! `GET /api/reports?type=...` with the closed set of report discriminators.
//! Unknown kinds are a client error; store failures surface as the generic
//! internal-error envelope with the cause kept in the logs.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use storepulse_analytics::report::{self, Report, ReportKind};

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ReportParams {
    /// Report discriminator ("overview", "popular-products", ...)
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub success: bool,
    pub data: Report,
}

pub async fn get_report(
    State(state): State<AppState>,
    params: Result<Query<ReportParams>, QueryRejection>,
) -> Result<Json<ReportResponse>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let Some(raw) = params.kind.as_deref() else {
        return Err(ApiError::BadRequest("missing report type".to_string()));
    };
    let kind = raw
        .parse::<ReportKind>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let data = report::assemble(kind, state.events.as_ref(), state.catalog.as_ref()).await?;

    Ok(Json(ReportResponse {
        success: true,
        data,
    }))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{
        UnreachableStore, body_json, get, product, test_app, test_app_with_events,
    };
    use axum::http::StatusCode;
    use chrono::{TimeZone, Utc};
    use serde_json::Map;
    use std::sync::Arc;
    use storepulse_core::events::{PageView, ProductView, SearchQuery, UserSession};
    use storepulse_core::store::EventStore;
    use tower::ServiceExt;

    fn search(raw: &str) -> SearchQuery {
        SearchQuery {
            raw_query: raw.to_string(),
            normalized_query: raw.to_lowercase(),
            total_results: 0,
            source: "products".to_string(),
            user_id: None,
            meta: Map::new(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_overview_report_envelope() {
        let app = test_app();
        app.events
            .record_page_view(PageView {
                path: "/".to_string(),
                timestamp: Utc::now(),
            })
            .await
            .unwrap();
        app.events
            .record_session(UserSession {
                user_id: "u-1".to_string(),
                login_at: Utc::now(),
            })
            .await
            .unwrap();

        let response = app
            .router
            .oneshot(get("/api/reports?type=overview"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["pageViews"], 1);
        assert_eq!(json["data"]["productViews"], 0);
        assert_eq!(json["data"]["sessions"], 1);
        assert_eq!(json["data"]["activeSessions"], 1);
        assert_eq!(json["data"]["dailyActiveSessions"], 1);
    }

    #[tokio::test]
    async fn test_monthly_views_series_over_http() {
        let app = test_app();
        for (month, day) in [(3, 1), (3, 9), (3, 21), (7, 4), (7, 11)] {
            app.events
                .record_page_view(PageView {
                    path: "/products".to_string(),
                    timestamp: Utc.with_ymd_and_hms(2024, month, day, 12, 0, 0).unwrap(),
                })
                .await
                .unwrap();
        }

        let response = app
            .router
            .oneshot(get("/api/reports?type=monthly-views"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["data"]["series"][0]["month"], "March");
        assert_eq!(json["data"]["series"][0]["views"], 3);
        assert_eq!(json["data"]["series"][1]["month"], "July");
        assert_eq!(json["data"]["series"][1]["views"], 2);
        // 3 -> 2 between the two most recent months present
        assert_eq!(json["data"]["growthPercent"], -33);
    }

    #[tokio::test]
    async fn test_top_searches_over_http() {
        let app = test_app();
        for raw in ["plc", "PLC", "plc", "inverter", "Inverter"] {
            app.events.record_search_query(search(raw)).await.unwrap();
        }

        let response = app
            .router
            .oneshot(get("/api/reports?type=top-searches"))
            .await
            .unwrap();
        let json = body_json(response).await;

        assert_eq!(json["data"]["searches"][0]["query"], "plc");
        assert_eq!(json["data"]["searches"][0]["count"], 3);
        assert_eq!(json["data"]["searches"][1]["query"], "inverter");
        assert_eq!(json["data"]["searches"][1]["count"], 2);
    }

    #[tokio::test]
    async fn test_popular_products_joins_catalog() {
        let app = test_app();
        app.catalog
            .upsert_product(&product("p1", "Drive Unit", 1))
            .await
            .unwrap();
        for _ in 0..3 {
            app.events
                .record_product_view(ProductView {
                    product_id: "p1".to_string(),
                    timestamp: Utc::now(),
                })
                .await
                .unwrap();
        }

        let response = app
            .router
            .oneshot(get("/api/reports?type=popular-products"))
            .await
            .unwrap();
        let json = body_json(response).await;

        assert_eq!(json["data"]["products"][0]["id"], "p1");
        assert_eq!(json["data"]["products"][0]["name"], "Drive Unit");
        assert_eq!(json["data"]["products"][0]["views"], 3);
    }

    #[tokio::test]
    async fn test_unknown_report_type_rejected() {
        let app = test_app();

        let response = app
            .router
            .oneshot(get("/api/reports?type=weekly-views"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "unknown report type: weekly-views");
    }

    #[tokio::test]
    async fn test_missing_report_type_rejected() {
        let app = test_app();

        let response = app.router.oneshot(get("/api/reports")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "missing report type");
    }

    #[tokio::test]
    async fn test_store_failure_maps_to_internal_error() {
        let (router, _logger) = test_app_with_events(Arc::new(UnreachableStore));

        let response = router
            .oneshot(get("/api/reports?type=overview"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "internal error");
        // The store's failure detail never reaches the wire
        assert!(!json["message"].as_str().unwrap().contains("connection"));
    }
}
