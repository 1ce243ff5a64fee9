//! Departments repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::department::{CreateDepartment, Department, UpdateDepartment},
};

#[derive(Clone)]
pub struct DepartmentsRepository {
    pool: Pool<Postgres>,
}

impl DepartmentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get department by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Department> {
        sqlx::query_as::<_, Department>("SELECT * FROM departments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::aggregate_not_found("Department", id))
    }

    /// List all departments
    pub async fn list(&self) -> AppResult<Vec<Department>> {
        let departments =
            sqlx::query_as::<_, Department>("SELECT * FROM departments ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(departments)
    }

    /// Check whether a name or code is already taken, excluding one department
    pub async fn name_or_code_taken(
        &self,
        name: &str,
        code: &str,
        exclude_id: Option<Uuid>,
    ) -> AppResult<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM departments
                WHERE (name = $1 OR code = $2) AND ($3::uuid IS NULL OR id != $3)
            )
            "#,
        )
        .bind(name)
        .bind(code)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    /// Create a new department
    pub async fn create(&self, dto: &CreateDepartment) -> AppResult<Department> {
        let department = sqlx::query_as::<_, Department>(
            r#"
            INSERT INTO departments (name, code, description)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.code)
        .bind(&dto.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(department)
    }

    /// Update a department
    pub async fn update(&self, id: Uuid, dto: &UpdateDepartment) -> AppResult<Department> {
        let department = sqlx::query_as::<_, Department>(
            r#"
            UPDATE departments
            SET name = COALESCE($2, name),
                code = COALESCE($3, code),
                description = COALESCE($4, description)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&dto.name)
        .bind(&dto.code)
        .bind(&dto.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::aggregate_not_found("Department", id))?;
        Ok(department)
    }

    /// Count rooms attached to a department
    pub async fn count_rooms(&self, id: Uuid) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM rooms WHERE department_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Delete a department
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::aggregate_not_found("Department", id));
        }
        Ok(())
    }
}
