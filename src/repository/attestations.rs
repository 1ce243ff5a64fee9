//! Attestations repository for database operations

use chrono::{NaiveDate, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::attestation::{Attestation, AttestationQuery},
};

#[derive(Clone)]
pub struct AttestationsRepository {
    pool: Pool<Postgres>,
}

impl AttestationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get attestation by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Attestation> {
        sqlx::query_as::<_, Attestation>("SELECT * FROM attestations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::aggregate_not_found("Attestation", id))
    }

    /// Get the attestation of a request, if any
    pub async fn get_by_request(&self, request_id: Uuid) -> AppResult<Option<Attestation>> {
        let attestation =
            sqlx::query_as::<_, Attestation>("SELECT * FROM attestations WHERE request_id = $1")
                .bind(request_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(attestation)
    }

    /// Create a new attestation
    pub async fn create(
        &self,
        request_id: Uuid,
        academic_year: &str,
        period_start: NaiveDate,
        period_end: NaiveDate,
        status: crate::models::enums::AttestationStatus,
        comment: Option<&str>,
    ) -> AppResult<Attestation> {
        let attestation = sqlx::query_as::<_, Attestation>(
            r#"
            INSERT INTO attestations
                (request_id, academic_year, period_start, period_end, status, comment)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(request_id)
        .bind(academic_year)
        .bind(period_start)
        .bind(period_end)
        .bind(status)
        .bind(comment)
        .fetch_one(&self.pool)
        .await?;
        Ok(attestation)
    }

    /// List attestations with optional filters
    pub async fn list(&self, query: &AttestationQuery) -> AppResult<Vec<Attestation>> {
        let attestations = sqlx::query_as::<_, Attestation>(
            r#"
            SELECT * FROM attestations
            WHERE ($1::attestation_status IS NULL OR status = $1)
              AND ($2::text IS NULL OR academic_year = $2)
            ORDER BY period_end
            "#,
        )
        .bind(query.status)
        .bind(&query.academic_year)
        .fetch_all(&self.pool)
        .await?;
        Ok(attestations)
    }

    /// Pending attestations due for a reminder: within the window and either
    /// never reminded or last reminded at least a week ago
    pub async fn list_due_for_reminder(
        &self,
        today: NaiveDate,
        window_days: i64,
    ) -> AppResult<Vec<Attestation>> {
        let attestations = sqlx::query_as::<_, Attestation>(
            r#"
            SELECT * FROM attestations
            WHERE status = 'pending'
              AND period_end - $1 <= $2
              AND (reminder_sent_at IS NULL OR reminder_sent_at <= NOW() - INTERVAL '7 days')
            ORDER BY period_end
            "#,
        )
        .bind(today)
        .bind(window_days as i32)
        .fetch_all(&self.pool)
        .await?;
        Ok(attestations)
    }

    /// Mark a reminder as sent now
    pub async fn mark_reminder_sent(&self, id: Uuid) -> AppResult<Attestation> {
        let attestation = sqlx::query_as::<_, Attestation>(
            "UPDATE attestations SET reminder_sent_at = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::aggregate_not_found("Attestation", id))?;
        Ok(attestation)
    }

    /// Expire every pending attestation past its period end; returns the count
    pub async fn expire_due(&self, today: NaiveDate) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE attestations SET status = 'expired' WHERE status = 'pending' AND period_end < $1",
        )
        .bind(today)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Mark an attestation expired (no-op guard belongs to the caller)
    pub async fn expire(&self, id: Uuid) -> AppResult<Attestation> {
        let attestation = sqlx::query_as::<_, Attestation>(
            "UPDATE attestations SET status = 'expired' WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::aggregate_not_found("Attestation", id))?;
        Ok(attestation)
    }
}
