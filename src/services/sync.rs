//! Status reconciliation across the room → item → request cascade
//!
//! Every function here takes `&mut PgConnection` so it runs inside the
//! caller's transaction: a room-installation update and the cascade it
//! triggers either all commit or all roll back.

use chrono::Utc;
use sqlx::{PgConnection, Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{InstallationStatus, RequestStatus, StatusPin},
        request::{ConsistencyReport, ItemConsistency},
    },
};

/// Derive a request status from its current status and its item statuses.
///
/// Returns None when nothing should change: terminal requests are never
/// rewritten and a request without items keeps whatever it has.
pub fn compute_request_status(
    current: RequestStatus,
    item_statuses: &[InstallationStatus],
) -> Option<RequestStatus> {
    if current.is_terminal() || item_statuses.is_empty() {
        return None;
    }

    let all_installed = item_statuses
        .iter()
        .all(|s| *s == InstallationStatus::AllInstalled);
    let all_pending = item_statuses
        .iter()
        .all(|s| *s == InstallationStatus::Pending);

    let next = if all_installed {
        RequestStatus::Installed
    } else if all_pending && current == RequestStatus::New {
        RequestStatus::New
    } else {
        RequestStatus::InProgress
    };

    (next != current).then_some(next)
}

/// Recompute one item's status from its room counts and pin.
///
/// Writes only when the status actually changes; returns (old, new) in that
/// case so the caller can record it. Sets installed_at on entry into
/// all_installed (only when unset) and clears it on exit.
pub async fn recompute_item_status(
    conn: &mut PgConnection,
    item_id: Uuid,
) -> AppResult<Option<(InstallationStatus, InstallationStatus)>> {
    let item = sqlx::query(
        "SELECT status, status_pin, installed_at FROM request_items WHERE id = $1",
    )
    .bind(item_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::aggregate_not_found("Request item", item_id))?;

    let current: InstallationStatus = item.get("status");
    let pin: Option<StatusPin> = item.get("status_pin");
    let installed_at: Option<chrono::DateTime<Utc>> = item.get("installed_at");

    let counts = sqlx::query(
        r#"
        SELECT COUNT(*) AS total, COUNT(*) FILTER (WHERE installed) AS installed
        FROM room_installations WHERE request_item_id = $1
        "#,
    )
    .bind(item_id)
    .fetch_one(&mut *conn)
    .await?;

    let total: i64 = counts.get("total");
    let installed: i64 = counts.get("installed");

    let next = InstallationStatus::compute(total, installed, pin);
    if next == current {
        return Ok(None);
    }

    let now = Utc::now();
    let new_installed_at = if next == InstallationStatus::AllInstalled {
        installed_at.or(Some(now))
    } else {
        None
    };

    sqlx::query(
        r#"
        UPDATE request_items
        SET status = $2, installed_at = $3, status_changed_at = $4
        WHERE id = $1
        "#,
    )
    .bind(item_id)
    .bind(next)
    .bind(new_installed_at)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(Some((current, next)))
}

/// Recompute a request's status from its items' statuses.
pub async fn recompute_request_status(
    conn: &mut PgConnection,
    request_id: Uuid,
) -> AppResult<Option<(RequestStatus, RequestStatus)>> {
    let current: RequestStatus =
        sqlx::query_scalar("SELECT status FROM requests WHERE id = $1")
            .bind(request_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::aggregate_not_found("Request", request_id))?;

    let item_statuses: Vec<InstallationStatus> =
        sqlx::query_scalar("SELECT status FROM request_items WHERE request_id = $1")
            .bind(request_id)
            .fetch_all(&mut *conn)
            .await?;

    let Some(next) = compute_request_status(current, &item_statuses) else {
        return Ok(None);
    };

    sqlx::query("UPDATE requests SET status = $2, updated_at = NOW() WHERE id = $1")
        .bind(request_id)
        .bind(next)
        .execute(&mut *conn)
        .await?;

    Ok(Some((current, next)))
}

/// Force a full reconciliation: every item, then the request.
pub async fn resync_request(conn: &mut PgConnection, request_id: Uuid) -> AppResult<()> {
    let item_ids: Vec<Uuid> =
        sqlx::query_scalar("SELECT id FROM request_items WHERE request_id = $1")
            .bind(request_id)
            .fetch_all(&mut *conn)
            .await?;

    for item_id in item_ids {
        recompute_item_status(conn, item_id).await?;
    }
    recompute_request_status(conn, request_id).await?;
    Ok(())
}

/// Read-only report comparing stored statuses against what the formulas say.
pub async fn check_consistency(
    pool: &Pool<Postgres>,
    request_id: Uuid,
) -> AppResult<ConsistencyReport> {
    let stored: RequestStatus = sqlx::query_scalar("SELECT status FROM requests WHERE id = $1")
        .bind(request_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::aggregate_not_found("Request", request_id))?;

    let rows = sqlx::query(
        r#"
        SELECT i.id, i.software_id, i.status, i.status_pin,
               COUNT(ri.id) AS total,
               COUNT(ri.id) FILTER (WHERE ri.installed) AS installed
        FROM request_items i
        LEFT JOIN room_installations ri ON ri.request_item_id = i.id
        WHERE i.request_id = $1
        GROUP BY i.id, i.software_id, i.status, i.status_pin
        ORDER BY i.created_at
        "#,
    )
    .bind(request_id)
    .fetch_all(pool)
    .await?;

    let mut items = Vec::with_capacity(rows.len());
    let mut computed_statuses = Vec::with_capacity(rows.len());
    for row in rows {
        let item_stored: InstallationStatus = row.get("status");
        let pin: Option<StatusPin> = row.get("status_pin");
        let computed =
            InstallationStatus::compute(row.get::<i64, _>("total"), row.get("installed"), pin);
        computed_statuses.push(computed);
        items.push(ItemConsistency {
            item_id: row.get("id"),
            software_id: row.get("software_id"),
            stored: item_stored,
            computed,
            consistent: item_stored == computed,
        });
    }

    let request_computed =
        compute_request_status(stored, &computed_statuses).unwrap_or(stored);

    Ok(ConsistencyReport {
        request_id,
        request_status_stored: stored,
        request_status_computed: request_computed,
        consistent: stored == request_computed && items.iter().all(|i| i.consistent),
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use InstallationStatus::*;

    #[test]
    fn all_items_installed_yields_installed() {
        assert_eq!(
            compute_request_status(RequestStatus::InProgress, &[AllInstalled, AllInstalled]),
            Some(RequestStatus::Installed)
        );
    }

    #[test]
    fn all_pending_keeps_new_requests_new() {
        assert_eq!(
            compute_request_status(RequestStatus::New, &[Pending, Pending]),
            None
        );
        assert_eq!(
            compute_request_status(RequestStatus::Installed, &[Pending, Pending]),
            Some(RequestStatus::InProgress)
        );
    }

    #[test]
    fn mixed_statuses_mean_in_progress() {
        assert_eq!(
            compute_request_status(RequestStatus::New, &[Pending, PartiallyInstalled]),
            Some(RequestStatus::InProgress)
        );
        assert_eq!(
            compute_request_status(RequestStatus::InProgress, &[AllInstalled, Problem]),
            None
        );
        assert_eq!(
            compute_request_status(RequestStatus::Installed, &[AllInstalled, Changed]),
            Some(RequestStatus::InProgress)
        );
    }

    #[test]
    fn terminal_requests_are_never_rewritten() {
        assert_eq!(
            compute_request_status(RequestStatus::Closed, &[AllInstalled]),
            None
        );
        assert_eq!(
            compute_request_status(RequestStatus::Expired, &[Pending]),
            None
        );
    }

    #[test]
    fn requests_without_items_are_left_alone() {
        assert_eq!(compute_request_status(RequestStatus::New, &[]), None);
    }

    #[test]
    fn unchanged_status_writes_nothing() {
        assert_eq!(
            compute_request_status(RequestStatus::InProgress, &[PartiallyInstalled]),
            None
        );
        assert_eq!(
            compute_request_status(RequestStatus::Installed, &[AllInstalled]),
            None
        );
    }
}
