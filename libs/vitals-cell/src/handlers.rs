// libs/vitals-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared_database::AppState;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::models::{
    RangeQuery, RecentQuery, RecentResponse, RollupRange, SummaryResponse, TrendsResponse, Vital,
    VitalUpdate, VitalsCreate,
};
use crate::services::vitals::VitalsService;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_list_limit")]
    pub limit: i64,
}

fn default_list_limit() -> i64 {
    100
}

fn parse_range(query: &RangeQuery) -> Result<RollupRange, AppError> {
    RollupRange::parse(&query.range)
        .ok_or_else(|| AppError::BadRequest("range must be one of 7d, 30d, all".to_string()))
}

#[axum::debug_handler]
pub async fn create_vital(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(entry): Json<VitalsCreate>,
) -> Result<(StatusCode, Json<Vital>), AppError> {
    let service = VitalsService::new(state.db.clone());
    let row = service.create(user.id, entry).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[axum::debug_handler]
pub async fn list_vitals(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Vital>>, AppError> {
    let service = VitalsService::new(state.db.clone());
    let rows = service.list(user.id, query.limit.clamp(1, 500)).await?;
    Ok(Json(rows))
}

#[axum::debug_handler]
pub async fn update_vital(
    State(state): State<Arc<AppState>>,
    Path(vital_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
    Json(patch): Json<VitalUpdate>,
) -> Result<Json<Vital>, AppError> {
    let service = VitalsService::new(state.db.clone());
    let row = service.update(user.id, vital_id, patch).await?;
    Ok(Json(row))
}

#[axum::debug_handler]
pub async fn delete_vital(
    State(state): State<Arc<AppState>>,
    Path(vital_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode, AppError> {
    let service = VitalsService::new(state.db.clone());
    service.delete(user.id, vital_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SummaryResponse>, AppError> {
    let range = parse_range(&query)?;
    let service = VitalsService::new(state.db.clone());
    let summary = service.summary(user.id, range).await?;
    Ok(Json(summary))
}

#[axum::debug_handler]
pub async fn get_trends(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TrendsResponse>, AppError> {
    let range = parse_range(&query)?;
    let service = VitalsService::new(state.db.clone());
    let trends = service.trends(user.id, range).await?;
    Ok(Json(trends))
}

#[axum::debug_handler]
pub async fn get_recent(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecentQuery>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<RecentResponse>, AppError> {
    let service = VitalsService::new(state.db.clone());
    let recent = service.recent(user.id, query.limit).await?;
    Ok(Json(recent))
}
