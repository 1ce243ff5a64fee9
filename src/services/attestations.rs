//! Annual re-attestation service

use chrono::Utc;
use uuid::Uuid;

use crate::{
    config::AttestationConfig,
    error::{AppError, AppResult},
    models::{
        academic_year::AcademicYear,
        attestation::{
            Attestation, AttestationQuery, BulkAttestationResult, ConfirmAttestation,
            CreateAttestation,
        },
        enums::{AttestationStatus, RequestStatus},
        user::UserClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AttestationsService {
    repository: Repository,
    config: AttestationConfig,
}

impl AttestationsService {
    pub fn new(repository: Repository, config: AttestationConfig) -> Self {
        Self { repository, config }
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Attestation> {
        self.repository.attestations.get_by_id(id).await
    }

    pub async fn get_by_request(&self, request_id: Uuid) -> AppResult<Attestation> {
        self.repository.requests.get_by_id(request_id).await?;
        self.repository
            .attestations
            .get_by_request(request_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No attestation for request {}", request_id))
            })
    }

    pub async fn list(&self, query: &AttestationQuery) -> AppResult<Vec<Attestation>> {
        self.repository.attestations.list(query).await
    }

    /// Create an attestation for a request; one per request
    pub async fn create(&self, actor: &UserClaims, dto: CreateAttestation) -> AppResult<Attestation> {
        actor.require_it_service()?;
        self.repository.requests.get_by_id(dto.request_id).await?;

        if self
            .repository
            .attestations
            .get_by_request(dto.request_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Request {} already has an attestation",
                dto.request_id
            )));
        }

        let year = AcademicYear::from_year(&dto.academic_year)?;
        if dto.period_start >= dto.period_end {
            return Err(AppError::BusinessRule(
                "Attestation period start must precede its end".to_string(),
            ));
        }
        if !year.contains(dto.period_start) || !year.contains(dto.period_end) {
            return Err(AppError::BusinessRule(format!(
                "Attestation period must lie within the academic year {}",
                year
            )));
        }

        // not_required is only settable at creation; anything else is pending
        let status = match dto.status {
            Some(AttestationStatus::NotRequired) => AttestationStatus::NotRequired,
            _ => AttestationStatus::Pending,
        };

        self.repository
            .attestations
            .create(
                dto.request_id,
                year.year(),
                dto.period_start,
                dto.period_end,
                status,
                dto.comment.as_deref(),
            )
            .await
    }

    /// Confirm a pending attestation and extend the request's expiry
    pub async fn confirm(
        &self,
        actor: &UserClaims,
        id: Uuid,
        dto: ConfirmAttestation,
    ) -> AppResult<Attestation> {
        let attestation = self.repository.attestations.get_by_id(id).await?;
        let request = self
            .repository
            .requests
            .get_by_id(attestation.request_id)
            .await?;

        if !actor.role.can_view_all_requests() {
            let teacher = self.repository.users.get_teacher(request.teacher_id).await?;
            if teacher.user_id != actor.user_id {
                return Err(AppError::Authorization(
                    "Only the requesting teacher can confirm this attestation".to_string(),
                ));
            }
        }

        if attestation.status != AttestationStatus::Pending {
            return Err(AppError::BusinessRule(format!(
                "Only pending attestations can be confirmed (current: {})",
                attestation.status
            )));
        }

        let mut tx = self.repository.pool.begin().await?;

        let confirmed = sqlx::query_as::<_, Attestation>(
            r#"
            UPDATE attestations
            SET status = 'confirmed', confirmed_at = $2, comment = COALESCE($3, comment)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .bind(&dto.comment)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE requests SET expires_at = $2, updated_at = NOW() WHERE id = $1")
            .bind(attestation.request_id)
            .bind(attestation.period_end)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(confirmed)
    }

    /// Expire one attestation; confirmed ones are left untouched
    pub async fn expire(&self, actor: &UserClaims, id: Uuid) -> AppResult<Attestation> {
        actor.require_it_service()?;
        let attestation = self.repository.attestations.get_by_id(id).await?;
        if attestation.status == AttestationStatus::Confirmed {
            return Ok(attestation);
        }
        self.repository.attestations.expire(id).await
    }

    /// Expire every pending attestation past its period end (cron entry point)
    pub async fn expire_due(&self, actor: &UserClaims) -> AppResult<BulkAttestationResult> {
        actor.require_it_service()?;
        let affected = self
            .repository
            .attestations
            .expire_due(Utc::now().date_naive())
            .await?;
        Ok(BulkAttestationResult { affected })
    }

    /// Pending attestations inside the reminder window
    pub async fn list_due_for_reminder(&self, actor: &UserClaims) -> AppResult<Vec<Attestation>> {
        actor.require_it_service()?;
        self.repository
            .attestations
            .list_due_for_reminder(Utc::now().date_naive(), self.config.reminder_window_days)
            .await
    }

    pub async fn mark_reminder_sent(&self, actor: &UserClaims, id: Uuid) -> AppResult<Attestation> {
        actor.require_it_service()?;
        self.repository.attestations.get_by_id(id).await?;
        self.repository.attestations.mark_reminder_sent(id).await
    }

    /// Create attestations for every installed request of a year that lacks
    /// one, spanning the academic year. Idempotent; returns the count.
    pub async fn run_campaign(
        &self,
        actor: &UserClaims,
        academic_year: &str,
    ) -> AppResult<BulkAttestationResult> {
        actor.require_it_service()?;
        let year = AcademicYear::from_year(academic_year)?;

        let request_ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT r.id FROM requests r
            WHERE r.academic_year = $1
              AND r.status = $2
              AND NOT EXISTS (SELECT 1 FROM attestations a WHERE a.request_id = r.id)
            "#,
        )
        .bind(year.year())
        .bind(RequestStatus::Installed)
        .fetch_all(&self.repository.pool)
        .await?;

        let mut tx = self.repository.pool.begin().await?;
        for request_id in &request_ids {
            sqlx::query(
                r#"
                INSERT INTO attestations (request_id, academic_year, period_start, period_end)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(request_id)
            .bind(year.year())
            .bind(year.start())
            .bind(year.end())
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(BulkAttestationResult {
            affected: request_ids.len() as u64,
        })
    }
}
