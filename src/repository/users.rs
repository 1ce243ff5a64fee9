//! Users repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::UserRole,
        user::{CreateUser, Teacher, UpdateUser, User, UserQuery},
    },
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::aggregate_not_found("User", id))
    }

    /// Get user by email
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// List users with optional role/active filters
    pub async fn list(&self, query: &UserQuery) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE ($1::user_role IS NULL OR role = $1)
              AND ($2::boolean IS NULL OR active = $2)
            ORDER BY last_name, first_name
            "#,
        )
        .bind(query.role)
        .bind(query.active)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    /// Check whether an email is already taken
    pub async fn email_taken(&self, email: &str, exclude_id: Option<Uuid>) -> AppResult<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE email = $1 AND ($2::uuid IS NULL OR id != $2)
            )
            "#,
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    /// Check whether an employee number is already taken
    pub async fn employee_number_taken(&self, employee_number: &str) -> AppResult<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM teachers WHERE employee_number = $1)",
        )
        .bind(employee_number)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    /// Get the teacher specialization for a user
    pub async fn get_teacher_by_user(&self, user_id: Uuid) -> AppResult<Option<Teacher>> {
        let teacher = sqlx::query_as::<_, Teacher>("SELECT * FROM teachers WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(teacher)
    }

    /// Get a teacher by its own id
    pub async fn get_teacher(&self, id: Uuid) -> AppResult<Teacher> {
        sqlx::query_as::<_, Teacher>("SELECT * FROM teachers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::aggregate_not_found("Teacher", id))
    }

    /// Create a new user
    pub async fn create(&self, dto: &CreateUser, password_hash: Option<String>) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, last_name, first_name, password, sso_id, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&dto.email)
        .bind(&dto.last_name)
        .bind(&dto.first_name)
        .bind(password_hash)
        .bind(&dto.sso_id)
        .bind(dto.role)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    /// Create a user with its teacher specialization in one transaction
    pub async fn create_teacher(
        &self,
        dto: &CreateUser,
        password_hash: Option<String>,
        employee_number: &str,
        office: Option<&str>,
    ) -> AppResult<(User, Teacher)> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, last_name, first_name, password, sso_id, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&dto.email)
        .bind(&dto.last_name)
        .bind(&dto.first_name)
        .bind(password_hash)
        .bind(&dto.sso_id)
        .bind(UserRole::Teacher)
        .fetch_one(&mut *tx)
        .await?;

        let teacher = sqlx::query_as::<_, Teacher>(
            r#"
            INSERT INTO teachers (user_id, employee_number, office)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(employee_number)
        .bind(office)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((user, teacher))
    }

    /// Attach an IT-service specialization to a user
    pub async fn create_it_service_member(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query("INSERT INTO it_service_members (user_id) VALUES ($1)")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Attach an administrator specialization to a user
    pub async fn create_administrator(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query("INSERT INTO administrators (user_id) VALUES ($1)")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Check whether a user already carries any specialization
    pub async fn has_specialization(&self, user_id: Uuid) -> AppResult<bool> {
        let has: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(SELECT 1 FROM teachers WHERE user_id = $1)
                OR EXISTS(SELECT 1 FROM it_service_members WHERE user_id = $1)
                OR EXISTS(SELECT 1 FROM administrators WHERE user_id = $1)
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(has)
    }

    /// Update a user
    pub async fn update(&self, id: Uuid, dto: &UpdateUser, password_hash: Option<String>) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                last_name = COALESCE($3, last_name),
                first_name = COALESCE($4, first_name),
                password = COALESCE($5, password),
                sso_id = COALESCE($6, sso_id),
                active = COALESCE($7, active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&dto.email)
        .bind(&dto.last_name)
        .bind(&dto.first_name)
        .bind(password_hash)
        .bind(&dto.sso_id)
        .bind(dto.active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::aggregate_not_found("User", id))?;
        Ok(user)
    }

    /// Deactivate a user account
    pub async fn deactivate(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET active = FALSE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::aggregate_not_found("User", id));
        }
        Ok(())
    }
}
