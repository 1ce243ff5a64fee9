//! Rooms repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        room::{CreateRoom, Room, UpdateRoom},
        software::Software,
    },
};

#[derive(Clone)]
pub struct RoomsRepository {
    pool: Pool<Postgres>,
}

impl RoomsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get room by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Room> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::aggregate_not_found("Room", id))
    }

    /// List all rooms, optionally scoped to a department
    pub async fn list(&self, department_id: Option<Uuid>) -> AppResult<Vec<Room>> {
        let rooms = sqlx::query_as::<_, Room>(
            r#"
            SELECT * FROM rooms
            WHERE $1::uuid IS NULL OR department_id = $1
            ORDER BY name
            "#,
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rooms)
    }

    /// Count existing rooms among the given ids
    pub async fn count_existing(&self, ids: &[Uuid]) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM rooms WHERE id = ANY($1)")
                .bind(ids)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Create a new room and set its installed software catalog
    pub async fn create(&self, dto: &CreateRoom) -> AppResult<Room> {
        let mut tx = self.pool.begin().await?;

        let room = sqlx::query_as::<_, Room>(
            r#"
            INSERT INTO rooms (name, capacity, room_type, location, description, department_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&dto.name)
        .bind(dto.capacity)
        .bind(dto.room_type)
        .bind(&dto.location)
        .bind(&dto.description)
        .bind(dto.department_id)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(software_ids) = &dto.software_ids {
            for software_id in software_ids {
                sqlx::query(
                    "INSERT INTO room_software (room_id, software_id) VALUES ($1, $2)",
                )
                .bind(room.id)
                .bind(software_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(room)
    }

    /// Update a room; `software_ids`, when given, replaces the catalog
    pub async fn update(&self, id: Uuid, dto: &UpdateRoom) -> AppResult<Room> {
        let mut tx = self.pool.begin().await?;

        let room = sqlx::query_as::<_, Room>(
            r#"
            UPDATE rooms
            SET name = COALESCE($2, name),
                capacity = COALESCE($3, capacity),
                room_type = COALESCE($4, room_type),
                location = COALESCE($5, location),
                description = COALESCE($6, description),
                department_id = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&dto.name)
        .bind(dto.capacity)
        .bind(dto.room_type)
        .bind(&dto.location)
        .bind(&dto.description)
        .bind(dto.department_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::aggregate_not_found("Room", id))?;

        if let Some(software_ids) = &dto.software_ids {
            sqlx::query("DELETE FROM room_software WHERE room_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for software_id in software_ids {
                sqlx::query(
                    "INSERT INTO room_software (room_id, software_id) VALUES ($1, $2)",
                )
                .bind(id)
                .bind(software_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(room)
    }

    /// Delete a room
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::aggregate_not_found("Room", id));
        }
        Ok(())
    }

    /// Software currently installed in the room (catalog, outside any request)
    pub async fn installed_software(&self, room_id: Uuid) -> AppResult<Vec<Software>> {
        let software = sqlx::query_as::<_, Software>(
            r#"
            SELECT s.* FROM software s
            JOIN room_software rs ON rs.software_id = s.id
            WHERE rs.room_id = $1
            ORDER BY s.name
            "#,
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(software)
    }
}
