//! Audit trail endpoints (read only)

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::history::{HistoryEntry, HistoryQuery},
    AppState,
};

use super::AuthenticatedUser;

/// List audit trail entries with filters
#[utoipa::path(
    get,
    path = "/history",
    tag = "history",
    security(("bearer_auth" = [])),
    params(HistoryQuery),
    responses(
        (status = 200, description = "History entries", body = Vec<HistoryEntry>),
        (status = 403, description = "IT service role required")
    )
)]
pub async fn list(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    claims.require_it_service()?;
    let entries = state.services.history.list(&query).await?;
    Ok(Json(entries))
}

/// Full trail of one request, oldest first
#[utoipa::path(
    get,
    path = "/requests/{id}/history",
    tag = "history",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "History entries", body = Vec<HistoryEntry>),
        (status = 404, description = "Request not found")
    )
)]
pub async fn list_by_request(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    claims.require_it_service()?;
    let entries = state.services.history.list_by_request(id).await?;
    Ok(Json(entries))
}
