// libs/vitals-cell/src/services/vitals.rs
use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::{
    RecentResponse, RollupRange, SummaryResponse, TrendsResponse, Vital, VitalUpdate,
    VitalsCreate, VitalsError,
};
use crate::services::rollup;

pub struct VitalsService {
    pool: PgPool,
}

impl VitalsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: Uuid, entry: VitalsCreate) -> Result<Vital, VitalsError> {
        let row = sqlx::query_as::<_, Vital>(
            r#"
            INSERT INTO vitals
                (user_id, recorded_at, systolic_bp, diastolic_bp, heart_rate,
                 temperature, glucose, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(entry.recorded_at)
        .bind(entry.systolic_bp)
        .bind(entry.diastolic_bp)
        .bind(entry.heart_rate)
        .bind(entry.temperature)
        .bind(entry.glucose)
        .bind(entry.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list(&self, user_id: Uuid, limit: i64) -> Result<Vec<Vital>, VitalsError> {
        let rows = sqlx::query_as::<_, Vital>(
            "SELECT * FROM vitals WHERE user_id = $1 ORDER BY recorded_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Partial edit of one entry, scoped to its owner.
    pub async fn update(
        &self,
        user_id: Uuid,
        vital_id: Uuid,
        patch: VitalUpdate,
    ) -> Result<Vital, VitalsError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Vital>(
            "SELECT * FROM vitals WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(vital_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(VitalsError::NotFound)?;

        let row = sqlx::query_as::<_, Vital>(
            r#"
            UPDATE vitals
            SET recorded_at = $3, systolic_bp = $4, diastolic_bp = $5,
                heart_rate = $6, temperature = $7, glucose = $8, notes = $9
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(vital_id)
        .bind(user_id)
        .bind(patch.recorded_at.unwrap_or(current.recorded_at))
        .bind(patch.systolic_bp.or(current.systolic_bp))
        .bind(patch.diastolic_bp.or(current.diastolic_bp))
        .bind(patch.heart_rate.or(current.heart_rate))
        .bind(patch.temperature.or(current.temperature))
        .bind(patch.glucose.or(current.glucose))
        .bind(patch.notes.or(current.notes))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    pub async fn delete(&self, user_id: Uuid, vital_id: Uuid) -> Result<(), VitalsError> {
        let result = sqlx::query("DELETE FROM vitals WHERE id = $1 AND user_id = $2")
            .bind(vital_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(VitalsError::NotFound);
        }
        Ok(())
    }

    pub async fn summary(
        &self,
        user_id: Uuid,
        range: RollupRange,
    ) -> Result<SummaryResponse, VitalsError> {
        debug!("Computing vitals summary for {}", user_id);

        let now = Utc::now();
        let window_start = range.window_days().map(|d| now - Duration::days(d));

        let rows = sqlx::query_as::<_, Vital>(
            r#"
            SELECT * FROM vitals
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR recorded_at >= $2)
            ORDER BY recorded_at ASC
            "#,
        )
        .bind(user_id)
        .bind(window_start)
        .fetch_all(&self.pool)
        .await?;

        // Previous window of equal length, for the temperature trend.
        let prev_temps: Vec<f64> = match range.window_days() {
            Some(days) => {
                let mid = now - Duration::days(days);
                let prev_start = now - Duration::days(2 * days);
                sqlx::query_scalar(
                    r#"
                    SELECT temperature FROM vitals
                    WHERE user_id = $1
                      AND recorded_at >= $2
                      AND recorded_at < $3
                      AND temperature IS NOT NULL
                    "#,
                )
                .bind(user_id)
                .bind(prev_start)
                .bind(mid)
                .fetch_all(&self.pool)
                .await?
            }
            None => Vec::new(),
        };

        let week_start = now - Duration::days(7);
        let entries_this_week: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM vitals WHERE user_id = $1 AND recorded_at >= $2",
        )
        .bind(user_id)
        .bind(week_start)
        .fetch_one(&self.pool)
        .await?;

        Ok(rollup::summarize(&rows, &prev_temps, entries_this_week))
    }

    pub async fn trends(
        &self,
        user_id: Uuid,
        range: RollupRange,
    ) -> Result<TrendsResponse, VitalsError> {
        let window_start = range
            .window_days()
            .map(|d| Utc::now() - Duration::days(d));

        let rows = sqlx::query_as::<_, Vital>(
            r#"
            SELECT * FROM vitals
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR recorded_at >= $2)
            ORDER BY recorded_at ASC
            "#,
        )
        .bind(user_id)
        .bind(window_start)
        .fetch_all(&self.pool)
        .await?;

        Ok(TrendsResponse {
            points: rollup::trend_points(&rows),
        })
    }

    pub async fn recent(&self, user_id: Uuid, limit: i64) -> Result<RecentResponse, VitalsError> {
        if !(1..=100).contains(&limit) {
            return Err(VitalsError::Validation(
                "limit must be between 1 and 100".to_string(),
            ));
        }

        let rows = self.list(user_id, limit).await?;
        Ok(RecentResponse {
            items: rollup::recent_entries(&rows),
        })
    }
}
