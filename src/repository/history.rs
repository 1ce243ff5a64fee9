//! History repository for the append-only audit trail

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::history::{HistoryEntry, HistoryQuery, NewHistoryEntry},
};

#[derive(Clone)]
pub struct HistoryRepository {
    pool: Pool<Postgres>,
}

impl HistoryRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Append an entry to the audit trail
    pub async fn insert(&self, entry: &NewHistoryEntry) -> AppResult<HistoryEntry> {
        let entry = sqlx::query_as::<_, HistoryEntry>(
            r#"
            INSERT INTO history_entries
                (request_id, request_item_id, software_id, user_id, action,
                 old_request_status, new_request_status,
                 old_installation_status, new_installation_status, comment)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(entry.request_id)
        .bind(entry.request_item_id)
        .bind(entry.software_id)
        .bind(entry.user_id)
        .bind(entry.action)
        .bind(entry.old_request_status)
        .bind(entry.new_request_status)
        .bind(entry.old_installation_status)
        .bind(entry.new_installation_status)
        .bind(&entry.comment)
        .fetch_one(&self.pool)
        .await?;
        Ok(entry)
    }

    /// List entries with filters, newest first
    pub async fn list(&self, query: &HistoryQuery) -> AppResult<Vec<HistoryEntry>> {
        let entries = sqlx::query_as::<_, HistoryEntry>(
            r#"
            SELECT * FROM history_entries
            WHERE ($1::uuid IS NULL OR request_id = $1)
              AND ($2::uuid IS NULL OR software_id = $2)
              AND ($3::uuid IS NULL OR user_id = $3)
              AND ($4::history_action IS NULL OR action = $4)
              AND ($5::timestamptz IS NULL OR recorded_at >= $5)
              AND ($6::timestamptz IS NULL OR recorded_at <= $6)
            ORDER BY recorded_at DESC
            LIMIT $7 OFFSET $8
            "#,
        )
        .bind(query.request_id)
        .bind(query.software_id)
        .bind(query.user_id)
        .bind(query.action)
        .bind(query.from)
        .bind(query.to)
        .bind(query.limit.unwrap_or(100))
        .bind(query.offset.unwrap_or(0))
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    /// Full trail of one request, oldest first
    pub async fn list_by_request(&self, request_id: Uuid) -> AppResult<Vec<HistoryEntry>> {
        let entries = sqlx::query_as::<_, HistoryEntry>(
            "SELECT * FROM history_entries WHERE request_id = $1 ORDER BY recorded_at",
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}
