// libs/provider-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// How a visit is delivered. A null facility on a slot or appointment
/// means telehealth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum VisitType {
    Telehealth,
    InPerson,
}

impl VisitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitType::Telehealth => "telehealth",
            VisitType::InPerson => "in_person",
        }
    }

    pub fn parse(s: &str) -> Option<VisitType> {
        match s.trim().to_lowercase().as_str() {
            "telehealth" => Some(VisitType::Telehealth),
            "in_person" => Some(VisitType::InPerson),
            _ => None,
        }
    }
}

impl fmt::Display for VisitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A published bookable window for one provider. A slot is not itself a
/// reservation; appointments keep only a provenance back-reference to it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Availability {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub facility_id: Option<Uuid>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub visit_type: VisitType,
    pub location: Option<String>,
    pub capacity: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAvailabilityRequest {
    pub facility_id: Option<Uuid>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub visit_type: VisitType,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub notes: Option<String>,
}

/// Partial update; only fields present in the body are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub visit_type: Option<VisitType>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailabilityQuery {
    pub provider_id: Option<Uuid>,
    pub visit_type: Option<VisitType>,
    pub start_from: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AvailabilityError {
    #[error("Availability not found")]
    NotFound,

    #[error("Invalid slot time: {0}")]
    InvalidTime(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("An identical slot is already published")]
    Duplicate,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for AvailabilityError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            // Unique-violation on the slot index surfaces as a conflict.
            if db.code().as_deref() == Some("23505") {
                return AvailabilityError::Duplicate;
            }
        }
        AvailabilityError::Database(e.to_string())
    }
}

impl From<AvailabilityError> for shared_models::error::AppError {
    fn from(e: AvailabilityError) -> Self {
        use shared_models::error::AppError;
        match e {
            AvailabilityError::NotFound => AppError::NotFound("Availability not found".to_string()),
            AvailabilityError::InvalidTime(msg) => AppError::BadRequest(msg),
            AvailabilityError::Validation(msg) => AppError::BadRequest(msg),
            AvailabilityError::Duplicate => {
                AppError::Conflict("An identical slot is already published".to_string())
            }
            AvailabilityError::Database(msg) => AppError::Database(msg),
        }
    }
}
