// libs/appointment-cell/src/services/booking.rs
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use shared_models::auth::{AuthUser, Role};

use crate::models::{Appointment, ApptStatus, SchedulingError, VisitType};
use crate::services::overlap::{patient_overlap, provider_overlap, ACTIVE, CONFIRMED_ONLY};
use crate::services::state_machine::validate_transition;
use crate::validate::{BookingInput, ReschedulePatch};

/// Booking operations for both entry surfaces. Every status-mutating
/// operation runs its guard and its write inside one transaction; an early
/// return drops the transaction, which rolls it back.
pub struct BookingService {
    pool: PgPool,
}

impl BookingService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Book a new appointment in `requested` status.
    ///
    /// Provider conflicts are checked against confirmed bookings only, so
    /// any number of patients may request the same window; the first
    /// approval consumes it. The patient is additionally barred from
    /// double-booking themselves across requested/confirmed.
    pub async fn create(&self, input: BookingInput) -> Result<Appointment, SchedulingError> {
        input.validate()?;

        let mut tx = self.pool.begin().await?;

        let patient_role: Option<String> =
            sqlx::query_scalar("SELECT role FROM users WHERE id = $1")
                .bind(input.patient_id)
                .fetch_optional(&mut *tx)
                .await?;
        if patient_role.is_none() {
            return Err(SchedulingError::PatientNotFound);
        }

        let provider_role: Option<String> =
            sqlx::query_scalar("SELECT role FROM users WHERE id = $1")
                .bind(input.provider_id)
                .fetch_optional(&mut *tx)
                .await?;
        match provider_role.as_deref() {
            Some("provider") => {}
            _ => return Err(SchedulingError::ProviderNotFound),
        }

        if provider_overlap(
            &mut tx,
            input.provider_id,
            input.start_at,
            input.end_at,
            CONFIRMED_ONLY,
            None,
        )
        .await?
        {
            return Err(SchedulingError::SlotTaken);
        }

        if patient_overlap(
            &mut tx,
            input.patient_id,
            input.start_at,
            input.end_at,
            ACTIVE,
            None,
        )
        .await?
        {
            return Err(SchedulingError::PatientDoubleBooked);
        }

        let appt = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments
                (patient_id, provider_id, facility_id, availability_id,
                 start_at, end_at, visit_type, location, reason, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'requested')
            RETURNING *
            "#,
        )
        .bind(input.patient_id)
        .bind(input.provider_id)
        .bind(input.facility_id)
        .bind(input.availability_id)
        .bind(input.start_at)
        .bind(input.end_at)
        .bind(input.visit_type)
        .bind(input.location)
        .bind(input.reason)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Appointment {} requested with provider {}", appt.id, appt.provider_id);
        Ok(appt)
    }

    /// Partial reschedule/edit by the appointment's patient or provider.
    /// When the window moves, both overlap rules re-run (excluding the
    /// appointment itself) before anything is written, so a conflicting
    /// patch is rejected whole.
    pub async fn reschedule(
        &self,
        caller_id: Uuid,
        appointment_id: Uuid,
        patch: ReschedulePatch,
    ) -> Result<Appointment, SchedulingError> {
        let mut tx = self.pool.begin().await?;

        let appt = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE id = $1 FOR UPDATE",
        )
        .bind(appointment_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(SchedulingError::NotFound)?;

        if caller_id != appt.patient_id && caller_id != appt.provider_id {
            return Err(SchedulingError::Forbidden(
                "Only the patient or provider can update this appointment".to_string(),
            ));
        }

        let merged = patch.merge(&appt)?;

        if merged.times_changed {
            if provider_overlap(
                &mut tx,
                appt.provider_id,
                merged.start_at,
                merged.end_at,
                CONFIRMED_ONLY,
                Some(appt.id),
            )
            .await?
            {
                return Err(SchedulingError::SlotTaken);
            }

            if patient_overlap(
                &mut tx,
                appt.patient_id,
                merged.start_at,
                merged.end_at,
                ACTIVE,
                Some(appt.id),
            )
            .await?
            {
                return Err(SchedulingError::PatientDoubleBooked);
            }
        }

        let updated = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments
            SET start_at = $2, end_at = $3, visit_type = $4, facility_id = $5,
                location = $6, reason = $7, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(appt.id)
        .bind(merged.start_at)
        .bind(merged.end_at)
        .bind(merged.visit_type)
        .bind(merged.facility_id)
        .bind(merged.location)
        .bind(merged.reason)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Confirm a requested appointment.
    ///
    /// The overlap re-check and the status write happen in one transaction
    /// holding the provider's user row, so two approvals racing over
    /// overlapping requests serialize and the loser sees the conflict.
    pub async fn approve(
        &self,
        caller: &AuthUser,
        appointment_id: Uuid,
    ) -> Result<Appointment, SchedulingError> {
        let mut tx = self.pool.begin().await?;

        let appt = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE id = $1 FOR UPDATE",
        )
        .bind(appointment_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(SchedulingError::NotFound)?;

        if caller.id != appt.provider_id && caller.role != Role::Staff {
            return Err(SchedulingError::Forbidden(
                "Only the provider/staff can approve".to_string(),
            ));
        }

        validate_transition(appt.status, ApptStatus::Confirmed)?;

        // Serialize competing approvals on this provider's calendar.
        let _: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(appt.provider_id)
            .fetch_optional(&mut *tx)
            .await?;

        if provider_overlap(
            &mut tx,
            appt.provider_id,
            appt.start_at,
            appt.end_at,
            CONFIRMED_ONLY,
            Some(appt.id),
        )
        .await?
        {
            return Err(SchedulingError::SlotTaken);
        }

        // Placeholder join link for confirmed telehealth visits; real call
        // provisioning lives outside this system.
        let video_url = (appt.visit_type == VisitType::Telehealth)
            .then(|| format!("https://telehealth.invalid/rooms/{}", appt.id));

        let updated = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments
            SET status = 'confirmed', video_url = $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(appt.id)
        .bind(video_url)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Appointment {} confirmed", updated.id);
        Ok(updated)
    }

    /// Refuse a requested appointment.
    pub async fn deny(
        &self,
        caller: &AuthUser,
        appointment_id: Uuid,
    ) -> Result<Appointment, SchedulingError> {
        let mut tx = self.pool.begin().await?;

        let appt = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE id = $1 FOR UPDATE",
        )
        .bind(appointment_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(SchedulingError::NotFound)?;

        if caller.id != appt.provider_id && caller.role != Role::Staff {
            return Err(SchedulingError::Forbidden(
                "Only the provider/staff can deny".to_string(),
            ));
        }

        validate_transition(appt.status, ApptStatus::Denied)?;

        let updated = sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = 'denied', updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(appt.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Cancel from any non-terminal status. Cancelling an already
    /// cancelled appointment is a no-op rather than an error; cancelling a
    /// denied one is an invalid transition. Cancellation only frees
    /// capacity, so no overlap re-check is needed.
    pub async fn cancel(
        &self,
        caller_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<Appointment, SchedulingError> {
        let mut tx = self.pool.begin().await?;

        let appt = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE id = $1 FOR UPDATE",
        )
        .bind(appointment_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(SchedulingError::NotFound)?;

        if caller_id != appt.patient_id && caller_id != appt.provider_id {
            return Err(SchedulingError::Forbidden(
                "Only the patient or provider can cancel this appointment".to_string(),
            ));
        }

        if appt.status == ApptStatus::Cancelled {
            debug!("Appointment {} already cancelled", appt.id);
            tx.commit().await?;
            return Ok(appt);
        }

        validate_transition(appt.status, ApptStatus::Cancelled)?;

        let updated = sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = 'cancelled', updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(appt.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Appointment {} cancelled", updated.id);
        Ok(updated)
    }

    /// A patient's bookings, ascending by start; hides denied/cancelled
    /// unless `active_only` is false. `limit` of None returns everything.
    pub async fn list_for_patient(
        &self,
        patient_id: Uuid,
        active_only: bool,
        limit: Option<i64>,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let statuses: Vec<String> = ACTIVE.iter().map(|s| s.as_str().to_string()).collect();

        let rows = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT * FROM appointments
            WHERE patient_id = $1
              AND (NOT $2 OR status = ANY($3))
            ORDER BY start_at ASC
            LIMIT $4
            "#,
        )
        .bind(patient_id)
        .bind(active_only)
        .bind(&statuses)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// A provider's calendar, optionally bounded below by `start_from`.
    pub async fn list_for_provider(
        &self,
        provider_id: Uuid,
        start_from: Option<DateTime<Utc>>,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let rows = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT * FROM appointments
            WHERE provider_id = $1
              AND ($2::timestamptz IS NULL OR start_at >= $2)
            ORDER BY start_at ASC
            "#,
        )
        .bind(provider_id)
        .bind(start_from)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
