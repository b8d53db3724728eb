// libs/provider-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared_database::AppState;
use shared_models::auth::{AuthUser, Role};
use shared_models::error::AppError;

use crate::models::{
    Availability, AvailabilityQuery, CreateAvailabilityRequest, UpdateAvailabilityRequest,
};
use crate::services::availability::AvailabilityService;

const LIST_LIMIT: i64 = 500;

fn require_provider(user: &AuthUser) -> Result<(), AppError> {
    if user.role != Role::Provider {
        return Err(AppError::Forbidden("Provider only".to_string()));
    }
    Ok(())
}

#[axum::debug_handler]
pub async fn list_availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<Availability>>, AppError> {
    let service = AvailabilityService::new(state.db.clone());
    let rows = service.list(&query, LIST_LIMIT).await?;
    Ok(Json(rows))
}

#[axum::debug_handler]
pub async fn my_availability(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Availability>>, AppError> {
    require_provider(&user)?;
    let service = AvailabilityService::new(state.db.clone());
    let rows = service.mine(user.id).await?;
    Ok(Json(rows))
}

#[axum::debug_handler]
pub async fn create_availability(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateAvailabilityRequest>,
) -> Result<(StatusCode, Json<Availability>), AppError> {
    require_provider(&user)?;
    let service = AvailabilityService::new(state.db.clone());
    let row = service.create(user.id, request).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[axum::debug_handler]
pub async fn update_availability(
    State(state): State<Arc<AppState>>,
    Path(availability_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<UpdateAvailabilityRequest>,
) -> Result<Json<Availability>, AppError> {
    require_provider(&user)?;
    let service = AvailabilityService::new(state.db.clone());
    let row = service.update(user.id, availability_id, request).await?;
    Ok(Json(row))
}

#[axum::debug_handler]
pub async fn delete_availability(
    State(state): State<Arc<AppState>>,
    Path(availability_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode, AppError> {
    require_provider(&user)?;
    let service = AvailabilityService::new(state.db.clone());
    service.delete(user.id, availability_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
