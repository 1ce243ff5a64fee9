//! Software catalog repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::software::{CreateSoftware, Software, SoftwareQuery, UpdateSoftware},
};

#[derive(Clone)]
pub struct SoftwareRepository {
    pool: Pool<Postgres>,
}

impl SoftwareRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get software by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Software> {
        sqlx::query_as::<_, Software>("SELECT * FROM software WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::aggregate_not_found("Software", id))
    }

    /// List software, filtered by name substring and active flag
    pub async fn list(&self, query: &SoftwareQuery) -> AppResult<Vec<Software>> {
        let software = sqlx::query_as::<_, Software>(
            r#"
            SELECT * FROM software
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
              AND ($2::boolean IS NULL OR active = $2)
            ORDER BY name, version
            "#,
        )
        .bind(&query.search)
        .bind(query.active)
        .fetch_all(&self.pool)
        .await?;
        Ok(software)
    }

    /// Check whether a (name, version) pair exists, excluding one entry
    pub async fn name_version_taken(
        &self,
        name: &str,
        version: &str,
        exclude_id: Option<Uuid>,
    ) -> AppResult<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM software
                WHERE name = $1 AND version = $2 AND ($3::uuid IS NULL OR id != $3)
            )
            "#,
        )
        .bind(name)
        .bind(version)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    /// Count active software among the given ids
    pub async fn count_active(&self, ids: &[Uuid]) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM software WHERE id = ANY($1) AND active = TRUE",
        )
        .bind(ids)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Create a new software entry
    pub async fn create(&self, dto: &CreateSoftware) -> AppResult<Software> {
        let software = sqlx::query_as::<_, Software>(
            r#"
            INSERT INTO software
                (name, publisher, version, usage, description, max_duration_days, license, logo_url)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, 365), $7, $8)
            RETURNING *
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.publisher)
        .bind(&dto.version)
        .bind(&dto.usage)
        .bind(&dto.description)
        .bind(dto.max_duration_days)
        .bind(&dto.license)
        .bind(&dto.logo_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(software)
    }

    /// Update a software entry
    pub async fn update(&self, id: Uuid, dto: &UpdateSoftware) -> AppResult<Software> {
        let software = sqlx::query_as::<_, Software>(
            r#"
            UPDATE software
            SET name = COALESCE($2, name),
                publisher = COALESCE($3, publisher),
                version = COALESCE($4, version),
                usage = COALESCE($5, usage),
                description = COALESCE($6, description),
                max_duration_days = COALESCE($7, max_duration_days),
                license = COALESCE($8, license),
                logo_url = COALESCE($9, logo_url),
                active = COALESCE($10, active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&dto.name)
        .bind(&dto.publisher)
        .bind(&dto.version)
        .bind(&dto.usage)
        .bind(&dto.description)
        .bind(dto.max_duration_days)
        .bind(&dto.license)
        .bind(&dto.logo_url)
        .bind(dto.active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::aggregate_not_found("Software", id))?;
        Ok(software)
    }

    /// Soft-delete a software entry
    pub async fn deactivate(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("UPDATE software SET active = FALSE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::aggregate_not_found("Software", id));
        }
        Ok(())
    }
}
