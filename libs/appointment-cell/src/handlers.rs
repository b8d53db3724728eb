// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared_database::AppState;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::models::{
    Appointment, CreateAppointmentRequest, MyAppointmentsQuery, ProviderAppointmentsQuery,
};
use crate::services::booking::BookingService;
use crate::validate::{BookingInput, ReschedulePatch};

#[axum::debug_handler]
pub async fn my_appointments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MyAppointmentsQuery>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let service = BookingService::new(state.db.clone());
    let rows = service
        .list_for_patient(user.id, query.active_only, None)
        .await?;
    Ok(Json(rows))
}

#[axum::debug_handler]
pub async fn provider_appointments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProviderAppointmentsQuery>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let service = BookingService::new(state.db.clone());
    let rows = service.list_for_provider(user.id, query.start_from).await?;
    Ok(Json(rows))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    // The patient is always the authenticated caller; the body cannot book
    // on someone else's behalf.
    let input = BookingInput {
        patient_id: user.id,
        provider_id: request.provider_id,
        facility_id: request.facility_id,
        availability_id: request.availability_id,
        start_at: request.start_at,
        end_at: request.end_at,
        visit_type: request.visit_type,
        location: request.location,
        reason: request.reason,
    };

    let service = BookingService::new(state.db.clone());
    let appt = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(appt)))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
    Json(patch): Json<ReschedulePatch>,
) -> Result<Json<Appointment>, AppError> {
    let service = BookingService::new(state.db.clone());
    let appt = service.reschedule(user.id, appointment_id, patch).await?;
    Ok(Json(appt))
}

#[axum::debug_handler]
pub async fn approve_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Appointment>, AppError> {
    let service = BookingService::new(state.db.clone());
    let appt = service.approve(&user, appointment_id).await?;
    Ok(Json(appt))
}

#[axum::debug_handler]
pub async fn deny_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode, AppError> {
    let service = BookingService::new(state.db.clone());
    service.deny(&user, appointment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode, AppError> {
    let service = BookingService::new(state.db.clone());
    service.cancel(user.id, appointment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
