// libs/vitals-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vital {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub systolic_bp: Option<i32>,
    pub diastolic_bp: Option<i32>,
    pub heart_rate: Option<i32>,
    pub temperature: Option<f64>,
    pub glucose: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VitalsCreate {
    pub recorded_at: DateTime<Utc>,
    pub systolic_bp: Option<i32>,
    pub diastolic_bp: Option<i32>,
    pub heart_rate: Option<i32>,
    pub temperature: Option<f64>,
    pub glucose: Option<f64>,
    pub notes: Option<String>,
}

/// Partial update; only fields present are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VitalUpdate {
    pub recorded_at: Option<DateTime<Utc>>,
    pub systolic_bp: Option<i32>,
    pub diastolic_bp: Option<i32>,
    pub heart_rate: Option<i32>,
    pub temperature: Option<f64>,
    pub glucose: Option<f64>,
    pub notes: Option<String>,
}

// ==============================================================================
// ROLLUP RESPONSES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvgBp {
    pub systolic: f64,
    pub diastolic: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub avg_bp: Option<AvgBp>,
    pub max_hr: Option<i32>,
    pub avg_temp: Option<f64>,
    /// "up" | "down", comparing this window's mean temperature to the
    /// previous window of the same length.
    pub temp_trend: Option<String>,
    pub entries_this_week: i64,
    pub last_entry_at: Option<DateTime<Utc>>,
    pub flagged_entries: i64,
}

impl SummaryResponse {
    pub fn empty() -> Self {
        Self {
            avg_bp: None,
            max_hr: None,
            avg_temp: None,
            temp_trend: None,
            entries_this_week: 0,
            last_entry_at: None,
            flagged_entries: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: DateTime<Utc>,
    pub systolic: Option<i32>,
    pub diastolic: Option<i32>,
    pub heart_rate: Option<i32>,
    pub temperature: Option<f64>,
    pub systolic_roll7: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendsResponse {
    pub points: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentEntry {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub systolic: Option<i32>,
    pub diastolic: Option<i32>,
    pub heart_rate: Option<i32>,
    pub temperature: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentResponse {
    pub items: Vec<RecentEntry>,
}

// ==============================================================================
// QUERY PARAMETERS
// ==============================================================================

/// Rollup window. `7d`/`30d` bound the query; `all` does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollupRange {
    Week,
    Month,
    All,
}

impl RollupRange {
    pub fn parse(s: &str) -> Option<RollupRange> {
        match s {
            "7d" => Some(RollupRange::Week),
            "30d" => Some(RollupRange::Month),
            "all" => Some(RollupRange::All),
            _ => None,
        }
    }

    pub fn window_days(&self) -> Option<i64> {
        match self {
            RollupRange::Week => Some(7),
            RollupRange::Month => Some(30),
            RollupRange::All => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RangeQuery {
    #[serde(default = "default_range")]
    pub range: String,
}

fn default_range() -> String {
    "7d".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_recent_limit")]
    pub limit: i64,
}

fn default_recent_limit() -> i64 {
    10
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum VitalsError {
    #[error("Vital entry not found")]
    NotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for VitalsError {
    fn from(e: sqlx::Error) -> Self {
        VitalsError::Database(e.to_string())
    }
}

impl From<VitalsError> for shared_models::error::AppError {
    fn from(e: VitalsError) -> Self {
        use shared_models::error::AppError;
        match e {
            VitalsError::NotFound => AppError::NotFound("Vital entry not found".to_string()),
            VitalsError::Validation(msg) => AppError::BadRequest(msg),
            VitalsError::Database(msg) => AppError::Database(msg),
        }
    }
}
