//! Event capture endpoints
//!
//! Each endpoint appends exactly one record. Timestamps are assigned here,
//! never taken from the client.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use storepulse_core::events::{InteractionLog, PageView, ProductView, UserSession};

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct Recorded {
    pub success: bool,
}

fn created() -> (StatusCode, Json<Recorded>) {
    (StatusCode::CREATED, Json(Recorded { success: true }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageViewBody {
    pub path: String,
}

pub async fn record_page_view(
    State(state): State<AppState>,
    body: Result<Json<PageViewBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    state
        .events
        .record_page_view(PageView {
            path: body.path,
            timestamp: Utc::now(),
        })
        .await?;

    Ok(created())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductViewBody {
    pub product_id: String,
}

pub async fn record_product_view(
    State(state): State<AppState>,
    body: Result<Json<ProductViewBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    state
        .events
        .record_product_view(ProductView {
            product_id: body.product_id,
            timestamp: Utc::now(),
        })
        .await?;

    Ok(created())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionBody {
    pub event: String,

    #[serde(default)]
    pub meta: Map<String, Value>,
}

pub async fn record_interaction(
    State(state): State<AppState>,
    body: Result<Json<InteractionBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    state
        .events
        .record_interaction(InteractionLog {
            event: body.event,
            meta: body.meta,
            timestamp: Utc::now(),
        })
        .await?;

    Ok(created())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionBody {
    pub user_id: String,
}

pub async fn record_session(
    State(state): State<AppState>,
    body: Result<Json<SessionBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    state
        .events
        .record_session(UserSession {
            user_id: body.user_id,
            login_at: Utc::now(),
        })
        .await?;

    Ok(created())
}
