// libs/provider-cell/src/services/availability.rs
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::{
    Availability, AvailabilityError, AvailabilityQuery, CreateAvailabilityRequest,
    UpdateAvailabilityRequest, VisitType,
};

/// Validates the slot shape shared by create and update paths.
pub fn validate_slot(
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
    visit_type: VisitType,
    facility_id: Option<Uuid>,
    capacity: i32,
) -> Result<(), AvailabilityError> {
    if end_at <= start_at {
        return Err(AvailabilityError::InvalidTime(
            "end_at must be after start_at".to_string(),
        ));
    }
    if visit_type == VisitType::InPerson && facility_id.is_none() {
        return Err(AvailabilityError::Validation(
            "in_person requires facility_id".to_string(),
        ));
    }
    if visit_type == VisitType::Telehealth && facility_id.is_some() {
        return Err(AvailabilityError::Validation(
            "telehealth must not include facility_id".to_string(),
        ));
    }
    if capacity < 1 {
        return Err(AvailabilityError::Validation(
            "capacity must be at least 1".to_string(),
        ));
    }
    Ok(())
}

pub struct AvailabilityService {
    pool: PgPool,
}

impl AvailabilityService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Public listing, ascending by start time, capped at `limit` rows.
    pub async fn list(
        &self,
        query: &AvailabilityQuery,
        limit: i64,
    ) -> Result<Vec<Availability>, AvailabilityError> {
        let rows = sqlx::query_as::<_, Availability>(
            r#"
            SELECT * FROM availability
            WHERE ($1::uuid IS NULL OR provider_id = $1)
              AND ($2::text IS NULL OR visit_type = $2)
              AND ($3::timestamptz IS NULL OR start_at >= $3)
            ORDER BY start_at ASC
            LIMIT $4
            "#,
        )
        .bind(query.provider_id)
        .bind(query.visit_type.map(|v| v.as_str().to_string()))
        .bind(query.start_from)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// All slots owned by one provider, unfiltered by time.
    pub async fn mine(&self, provider_id: Uuid) -> Result<Vec<Availability>, AvailabilityError> {
        let rows = sqlx::query_as::<_, Availability>(
            "SELECT * FROM availability WHERE provider_id = $1 ORDER BY start_at ASC",
        )
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Publish a slot. The provider identity comes from the authenticated
    /// caller, never from the request body.
    pub async fn create(
        &self,
        provider_id: Uuid,
        request: CreateAvailabilityRequest,
    ) -> Result<Availability, AvailabilityError> {
        debug!("Creating availability for provider {}", provider_id);

        let capacity = request.capacity.unwrap_or(1);
        validate_slot(
            request.start_at,
            request.end_at,
            request.visit_type,
            request.facility_id,
            capacity,
        )?;

        let row = sqlx::query_as::<_, Availability>(
            r#"
            INSERT INTO availability
                (provider_id, facility_id, start_at, end_at, visit_type, location, capacity, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(provider_id)
        .bind(request.facility_id)
        .bind(request.start_at)
        .bind(request.end_at)
        .bind(request.visit_type)
        .bind(request.location)
        .bind(capacity)
        .bind(request.notes)
        .fetch_one(&self.pool)
        .await?;

        debug!("Availability created with ID: {}", row.id);
        Ok(row)
    }

    /// Partial update, scoped to rows owned by the caller. A row owned by
    /// another provider answers NotFound, not Forbidden.
    pub async fn update(
        &self,
        provider_id: Uuid,
        availability_id: Uuid,
        request: UpdateAvailabilityRequest,
    ) -> Result<Availability, AvailabilityError> {
        debug!("Updating availability {}", availability_id);

        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Availability>(
            "SELECT * FROM availability WHERE id = $1 AND provider_id = $2 FOR UPDATE",
        )
        .bind(availability_id)
        .bind(provider_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AvailabilityError::NotFound)?;

        let start_at = request.start_at.unwrap_or(current.start_at);
        let end_at = request.end_at.unwrap_or(current.end_at);
        let visit_type = request.visit_type.unwrap_or(current.visit_type);
        let capacity = request.capacity.unwrap_or(current.capacity);
        let location = request.location.or(current.location);
        let notes = request.notes.or(current.notes);

        validate_slot(start_at, end_at, visit_type, current.facility_id, capacity)?;

        let row = sqlx::query_as::<_, Availability>(
            r#"
            UPDATE availability
            SET start_at = $3, end_at = $4, visit_type = $5, location = $6,
                capacity = $7, notes = $8
            WHERE id = $1 AND provider_id = $2
            RETURNING *
            "#,
        )
        .bind(availability_id)
        .bind(provider_id)
        .bind(start_at)
        .bind(end_at)
        .bind(visit_type)
        .bind(location)
        .bind(capacity)
        .bind(notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Delete a slot owned by the caller; same NotFound shape as update.
    pub async fn delete(
        &self,
        provider_id: Uuid,
        availability_id: Uuid,
    ) -> Result<(), AvailabilityError> {
        let result = sqlx::query("DELETE FROM availability WHERE id = $1 AND provider_id = $2")
            .bind(availability_id)
            .bind(provider_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AvailabilityError::NotFound);
        }
        Ok(())
    }
}
