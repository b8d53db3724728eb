// libs/facility-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use shared_database::AppState;
use shared_models::auth::{AuthUser, Role};
use shared_models::error::AppError;

use crate::models::{CreateFacilityRequest, Facility};

#[axum::debug_handler]
pub async fn list_facilities(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<AuthUser>,
) -> Result<Json<Vec<Facility>>, AppError> {
    let rows = sqlx::query_as::<_, Facility>("SELECT * FROM facilities ORDER BY name ASC")
        .fetch_all(&state.db)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(rows))
}

#[axum::debug_handler]
pub async fn create_facility(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<AuthUser>,
    Json(request): Json<CreateFacilityRequest>,
) -> Result<(StatusCode, Json<Facility>), AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::ValidationError("name is required".to_string()));
    }
    if request.timezone.trim().is_empty() {
        return Err(AppError::ValidationError("timezone is required".to_string()));
    }

    let row = sqlx::query_as::<_, Facility>(
        "INSERT INTO facilities (name, address, timezone) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(request.name.trim())
    .bind(request.address)
    .bind(request.timezone.trim())
    .fetch_one(&state.db)
    .await
    .map_err(|e| AppError::Database(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// Removing a facility leaves its slots and appointments in place with a
/// nulled facility reference (store-declared SET NULL), so bookings keep
/// their history while the location disappears from the directory.
#[axum::debug_handler]
pub async fn delete_facility(
    State(state): State<Arc<AppState>>,
    Path(facility_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode, AppError> {
    if user.role != Role::Staff {
        return Err(AppError::Forbidden("Staff only".to_string()));
    }

    let result = sqlx::query("DELETE FROM facilities WHERE id = $1")
        .bind(facility_id)
        .execute(&state.db)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Facility not found".to_string()));
    }

    info!("Facility {} deleted", facility_id);
    Ok(StatusCode::NO_CONTENT)
}
