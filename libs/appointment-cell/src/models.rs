// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

pub use provider_cell::models::VisitType;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// A booking between exactly one patient and one provider. Cancellation is
/// a status, not row deletion; only deleting one of the parties removes
/// the row (referential cascade).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub provider_id: Uuid,
    pub facility_id: Option<Uuid>,
    pub availability_id: Option<Uuid>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub visit_type: VisitType,
    pub location: Option<String>,
    pub reason: Option<String>,
    pub status: ApptStatus,
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ApptStatus {
    Requested,
    Confirmed,
    Denied,
    Cancelled,
    RescheduleRequested,
}

impl ApptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApptStatus::Requested => "requested",
            ApptStatus::Confirmed => "confirmed",
            ApptStatus::Denied => "denied",
            ApptStatus::Cancelled => "cancelled",
            ApptStatus::RescheduleRequested => "reschedule_requested",
        }
    }

    /// Terminal states admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ApptStatus::Denied | ApptStatus::Cancelled)
    }
}

impl fmt::Display for ApptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==============================================================================
// REQUEST/QUERY MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAppointmentRequest {
    pub provider_id: Uuid,
    pub facility_id: Option<Uuid>,
    pub availability_id: Option<Uuid>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub visit_type: VisitType,
    pub location: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MyAppointmentsQuery {
    /// Hide denied/cancelled bookings unless explicitly asked for.
    #[serde(default = "default_true")]
    pub active_only: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderAppointmentsQuery {
    pub start_from: Option<DateTime<Utc>>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum SchedulingError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Provider not found")]
    ProviderNotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Time slot not available")]
    SlotTaken,

    #[error("You already have an appointment that overlaps this time.")]
    PatientDoubleBooked,

    #[error("Invalid appointment time: {0}")]
    InvalidTime(String),

    #[error("Cannot change appointment from status={0}")]
    InvalidTransition(ApptStatus),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for SchedulingError {
    fn from(e: sqlx::Error) -> Self {
        SchedulingError::Database(e.to_string())
    }
}

impl From<SchedulingError> for shared_models::error::AppError {
    fn from(e: SchedulingError) -> Self {
        use shared_models::error::AppError;
        match e {
            SchedulingError::NotFound => AppError::NotFound("Appointment not found".to_string()),
            SchedulingError::ProviderNotFound => {
                AppError::NotFound("Provider not found".to_string())
            }
            SchedulingError::PatientNotFound => AppError::NotFound("Patient not found".to_string()),
            SchedulingError::SlotTaken => AppError::Conflict("Time slot not available".to_string()),
            SchedulingError::PatientDoubleBooked => AppError::Conflict(
                "You already have an appointment that overlaps this time.".to_string(),
            ),
            SchedulingError::InvalidTime(msg) => AppError::BadRequest(msg),
            SchedulingError::InvalidTransition(status) => {
                AppError::BadRequest(format!("Cannot change appointment from status={}", status))
            }
            SchedulingError::Forbidden(msg) => AppError::Forbidden(msg),
            SchedulingError::Validation(msg) => AppError::BadRequest(msg),
            SchedulingError::Database(msg) => AppError::Database(msg),
        }
    }
}
