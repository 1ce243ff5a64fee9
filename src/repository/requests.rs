//! Requests repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{InstallationStatus, RequestStatus},
        request::{
            CreateRequest, InstallationSummary, Request, RequestDetails, RequestItem,
            RequestItemDetails, RequestItemQuery, RequestQuery, RoomInstallation,
            RoomInstallationDetails, UpdateRequest,
        },
        room::RoomShort,
        software::Software,
    },
};

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get request by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Request> {
        sqlx::query_as::<_, Request>("SELECT * FROM requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::aggregate_not_found("Request", id))
    }

    /// List requests with optional filters, newest first
    pub async fn list(&self, query: &RequestQuery) -> AppResult<Vec<Request>> {
        let requests = sqlx::query_as::<_, Request>(
            r#"
            SELECT * FROM requests
            WHERE ($1::request_status IS NULL OR status = $1)
              AND ($2::text IS NULL OR academic_year = $2)
              AND ($3::uuid IS NULL OR teacher_id = $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(query.status)
        .bind(&query.academic_year)
        .bind(query.teacher_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    /// Open requests (new or in progress), oldest first for the IT queue
    pub async fn list_open(&self) -> AppResult<Vec<Request>> {
        let requests = sqlx::query_as::<_, Request>(
            r#"
            SELECT * FROM requests
            WHERE status IN ('new', 'in_progress')
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    /// Create a request with its items and room installations in one transaction
    pub async fn create(&self, dto: &CreateRequest) -> AppResult<Request> {
        let mut tx = self.pool.begin().await?;

        let request = sqlx::query_as::<_, Request>(
            r#"
            INSERT INTO requests (teacher_id, desired_date, academic_year, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(dto.teacher_id)
        .bind(dto.desired_date)
        .bind(&dto.academic_year)
        .bind(&dto.comment)
        .fetch_one(&mut *tx)
        .await?;

        for item in &dto.items {
            let item_id: Uuid = sqlx::query_scalar(
                r#"
                INSERT INTO request_items (request_id, software_id)
                VALUES ($1, $2)
                RETURNING id
                "#,
            )
            .bind(request.id)
            .bind(item.software_id)
            .fetch_one(&mut *tx)
            .await?;

            for room_id in &item.room_ids {
                sqlx::query(
                    r#"
                    INSERT INTO room_installations (request_item_id, room_id)
                    VALUES ($1, $2)
                    "#,
                )
                .bind(item_id)
                .bind(room_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(request)
    }

    /// Update a request's editable fields
    pub async fn update(&self, id: Uuid, dto: &UpdateRequest) -> AppResult<Request> {
        let request = sqlx::query_as::<_, Request>(
            r#"
            UPDATE requests
            SET desired_date = COALESCE($2, desired_date),
                academic_year = COALESCE($3, academic_year),
                comment = COALESCE($4, comment),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.desired_date)
        .bind(&dto.academic_year)
        .bind(&dto.comment)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::aggregate_not_found("Request", id))?;
        Ok(request)
    }

    /// Close a request, recording the closing comment and timestamp
    pub async fn close(&self, id: Uuid, comment: &str) -> AppResult<Request> {
        let request = sqlx::query_as::<_, Request>(
            r#"
            UPDATE requests
            SET status = 'closed',
                closing_comment = $2,
                closed_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(comment)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::aggregate_not_found("Request", id))?;
        Ok(request)
    }

    /// Set a request's status (transition check belongs to the caller)
    pub async fn set_status(&self, id: Uuid, status: RequestStatus) -> AppResult<Request> {
        let request = sqlx::query_as::<_, Request>(
            "UPDATE requests SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::aggregate_not_found("Request", id))?;
        Ok(request)
    }

    /// Get a request item by ID
    pub async fn get_item(&self, item_id: Uuid) -> AppResult<RequestItem> {
        sqlx::query_as::<_, RequestItem>("SELECT * FROM request_items WHERE id = $1")
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::aggregate_not_found("Request item", item_id))
    }

    /// Every item of a request, oldest first, without pagination
    pub async fn items_of_request(&self, request_id: Uuid) -> AppResult<Vec<RequestItem>> {
        let items = sqlx::query_as::<_, RequestItem>(
            "SELECT * FROM request_items WHERE request_id = $1 ORDER BY created_at",
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// List request items with filters and pagination
    pub async fn list_items(&self, query: &RequestItemQuery) -> AppResult<Vec<RequestItem>> {
        let items = sqlx::query_as::<_, RequestItem>(
            r#"
            SELECT * FROM request_items
            WHERE ($1::uuid IS NULL OR request_id = $1)
              AND ($2::uuid IS NULL OR software_id = $2)
              AND ($3::installation_status IS NULL OR status = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(query.request_id)
        .bind(query.software_id)
        .bind(query.status)
        .bind(query.limit.unwrap_or(100))
        .bind(query.offset.unwrap_or(0))
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Get a room installation row for (item, room)
    pub async fn get_room_installation(
        &self,
        item_id: Uuid,
        room_id: Uuid,
    ) -> AppResult<RoomInstallation> {
        sqlx::query_as::<_, RoomInstallation>(
            "SELECT * FROM room_installations WHERE request_item_id = $1 AND room_id = $2",
        )
        .bind(item_id)
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Room installation for item {} in room {} not found",
                item_id, room_id
            ))
        })
    }

    /// List room installations of an item
    pub async fn list_room_installations(
        &self,
        item_id: Uuid,
    ) -> AppResult<Vec<RoomInstallation>> {
        let rows = sqlx::query_as::<_, RoomInstallation>(
            "SELECT * FROM room_installations WHERE request_item_id = $1 ORDER BY assigned_at",
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Request with every item, software, and room expanded
    pub async fn get_details(&self, id: Uuid) -> AppResult<RequestDetails> {
        let request = self.get_by_id(id).await?;
        let items = self.items_of_request(id).await?;

        let mut details = Vec::with_capacity(items.len());
        for item in items {
            let software = sqlx::query_as::<_, Software>("SELECT * FROM software WHERE id = $1")
                .bind(item.software_id)
                .fetch_one(&self.pool)
                .await?;

            let installations = self.list_room_installations(item.id).await?;
            let mut rooms = Vec::with_capacity(installations.len());
            for installation in installations {
                let room = sqlx::query_as::<_, RoomShort>(
                    "SELECT id, name FROM rooms WHERE id = $1",
                )
                .bind(installation.room_id)
                .fetch_one(&self.pool)
                .await?;
                rooms.push(RoomInstallationDetails { installation, room });
            }

            details.push(RequestItemDetails {
                item,
                software,
                rooms,
            });
        }

        Ok(RequestDetails {
            request,
            items: details,
        })
    }

    /// Per-software installation progress for a request
    pub async fn installation_summary(&self, id: Uuid) -> AppResult<Vec<InstallationSummary>> {
        // Existence check first so an unknown request is a 404, not an empty list
        self.get_by_id(id).await?;
        let items = self.items_of_request(id).await?;

        let mut summaries = Vec::with_capacity(items.len());
        for item in items {
            let software = sqlx::query_as::<_, Software>("SELECT * FROM software WHERE id = $1")
                .bind(item.software_id)
                .fetch_one(&self.pool)
                .await?;

            let rooms_installed = sqlx::query_as::<_, RoomShort>(
                r#"
                SELECT r.id, r.name FROM rooms r
                JOIN room_installations ri ON ri.room_id = r.id
                WHERE ri.request_item_id = $1 AND ri.installed
                ORDER BY r.name
                "#,
            )
            .bind(item.id)
            .fetch_all(&self.pool)
            .await?;

            let rooms_pending = sqlx::query_as::<_, RoomShort>(
                r#"
                SELECT r.id, r.name FROM rooms r
                JOIN room_installations ri ON ri.room_id = r.id
                WHERE ri.request_item_id = $1 AND NOT ri.installed
                ORDER BY r.name
                "#,
            )
            .bind(item.id)
            .fetch_all(&self.pool)
            .await?;

            summaries.push(InstallationSummary {
                item_id: item.id,
                software,
                status: item.status,
                total_rooms: (rooms_installed.len() + rooms_pending.len()) as i64,
                installed_rooms: rooms_installed.len() as i64,
                rooms_installed,
                rooms_pending,
            });
        }

        Ok(summaries)
    }

    /// Installation statuses of every item of a request
    pub async fn item_statuses(&self, id: Uuid) -> AppResult<Vec<InstallationStatus>> {
        let statuses: Vec<InstallationStatus> =
            sqlx::query_scalar("SELECT status FROM request_items WHERE request_id = $1")
                .bind(id)
                .fetch_all(&self.pool)
                .await?;
        Ok(statuses)
    }
}
