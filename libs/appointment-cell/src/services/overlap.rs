// libs/appointment-cell/src/services/overlap.rs
//
// The single overlap primitive behind every conflict check. Callers pick
// which statuses count as occupying a window; the interval rule itself
// never varies.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::models::ApptStatus;

/// Only a confirmed appointment blocks a provider's window; any number of
/// requests may pile onto the same slot until one of them is approved.
pub const CONFIRMED_ONLY: &[ApptStatus] = &[ApptStatus::Confirmed];

/// A patient may not hold two pending-or-confirmed bookings that overlap.
pub const ACTIVE: &[ApptStatus] = &[ApptStatus::Requested, ApptStatus::Confirmed];

/// Half-open interval overlap: [s1,e1) and [s2,e2) share an instant iff
/// `s1 < e2 && e1 > s2`. Touching endpoints do not conflict.
pub fn intervals_overlap(
    s1: DateTime<Utc>,
    e1: DateTime<Utc>,
    s2: DateTime<Utc>,
    e2: DateTime<Utc>,
) -> bool {
    s1 < e2 && e1 > s2
}

/// Does any appointment of the given statuses occupy `[start, end)` on
/// this provider's calendar? `exclude` skips one appointment id so a
/// reschedule does not conflict with its own prior self.
pub async fn provider_overlap(
    conn: &mut PgConnection,
    provider_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    statuses: &[ApptStatus],
    exclude: Option<Uuid>,
) -> Result<bool, sqlx::Error> {
    let statuses: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();

    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM appointments
            WHERE provider_id = $1
              AND start_at < $2
              AND end_at > $3
              AND status = ANY($4)
              AND ($5::uuid IS NULL OR id <> $5)
        )
        "#,
    )
    .bind(provider_id)
    .bind(end)
    .bind(start)
    .bind(&statuses)
    .bind(exclude)
    .fetch_one(&mut *conn)
    .await?;

    Ok(exists)
}

/// Same interval rule keyed on the patient.
pub async fn patient_overlap(
    conn: &mut PgConnection,
    patient_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    statuses: &[ApptStatus],
    exclude: Option<Uuid>,
) -> Result<bool, sqlx::Error> {
    let statuses: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();

    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM appointments
            WHERE patient_id = $1
              AND start_at < $2
              AND end_at > $3
              AND status = ANY($4)
              AND ($5::uuid IS NULL OR id <> $5)
        )
        "#,
    )
    .bind(patient_id)
    .bind(end)
    .bind(start)
    .bind(&statuses)
    .bind(exclude)
    .fetch_one(&mut *conn)
    .await?;

    Ok(exists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, hour, min, 0).unwrap()
    }

    #[test]
    fn overlapping_windows_conflict() {
        assert!(intervals_overlap(at(9, 0), at(10, 0), at(9, 30), at(10, 30)));
        assert!(intervals_overlap(at(9, 30), at(10, 30), at(9, 0), at(10, 0)));
    }

    #[test]
    fn containment_conflicts() {
        assert!(intervals_overlap(at(9, 0), at(11, 0), at(9, 30), at(10, 0)));
        assert!(intervals_overlap(at(9, 30), at(10, 0), at(9, 0), at(11, 0)));
    }

    #[test]
    fn identical_windows_conflict() {
        assert!(intervals_overlap(at(9, 0), at(9, 30), at(9, 0), at(9, 30)));
    }

    #[test]
    fn touching_endpoints_do_not_conflict() {
        // 9:00-10:00 against 10:00-11:00: half-open, no shared instant.
        assert!(!intervals_overlap(at(9, 0), at(10, 0), at(10, 0), at(11, 0)));
        assert!(!intervals_overlap(at(10, 0), at(11, 0), at(9, 0), at(10, 0)));
    }

    #[test]
    fn disjoint_windows_do_not_conflict() {
        assert!(!intervals_overlap(at(9, 0), at(9, 30), at(14, 0), at(15, 0)));
    }
}
