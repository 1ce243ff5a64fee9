//! Installation tracking endpoints (items and room installations)

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::request::{
        MarkAllInstalled, RequestItem, RequestItemQuery, RoomInstallation,
        UpdateItemInstallation, UpdateRoomInstallation,
    },
    AppState,
};

use super::AuthenticatedUser;

/// List request items with filters
#[utoipa::path(
    get,
    path = "/items",
    tag = "installations",
    security(("bearer_auth" = [])),
    params(RequestItemQuery),
    responses(
        (status = 200, description = "Request items", body = Vec<RequestItem>),
        (status = 403, description = "IT service role required")
    )
)]
pub async fn list_items(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<RequestItemQuery>,
) -> AppResult<Json<Vec<RequestItem>>> {
    let items = state.services.installations.list_items(&claims, &query).await?;
    Ok(Json(items))
}

/// Get a request item
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "installations",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request item ID")),
    responses(
        (status = 200, description = "Request item", body = RequestItem),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RequestItem>> {
    let item = state.services.installations.get_item(&claims, id).await?;
    Ok(Json(item))
}

/// Update one room installation; statuses cascade upward
#[utoipa::path(
    put,
    path = "/requests/{request_id}/items/{item_id}/rooms/{room_id}",
    tag = "installations",
    security(("bearer_auth" = [])),
    params(
        ("request_id" = Uuid, Path, description = "Request ID"),
        ("item_id" = Uuid, Path, description = "Request item ID"),
        ("room_id" = Uuid, Path, description = "Room ID")
    ),
    request_body = UpdateRoomInstallation,
    responses(
        (status = 200, description = "Room installation updated", body = RoomInstallation),
        (status = 404, description = "Request, item, or room installation not found")
    )
)]
pub async fn update_room_installation(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((request_id, item_id, room_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(request): Json<UpdateRoomInstallation>,
) -> AppResult<Json<RoomInstallation>> {
    request.validate()?;
    let installation = state
        .services
        .installations
        .update_room_installation(&claims, request_id, item_id, room_id, request)
        .await?;
    Ok(Json(installation))
}

/// Mark every room of an item installed
#[utoipa::path(
    post,
    path = "/requests/{request_id}/items/{item_id}/install-all",
    tag = "installations",
    security(("bearer_auth" = [])),
    params(
        ("request_id" = Uuid, Path, description = "Request ID"),
        ("item_id" = Uuid, Path, description = "Request item ID")
    ),
    request_body = MarkAllInstalled,
    responses(
        (status = 200, description = "All rooms installed", body = RequestItem),
        (status = 422, description = "Item has no rooms")
    )
)]
pub async fn mark_all_installed(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((request_id, item_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<MarkAllInstalled>,
) -> AppResult<Json<RequestItem>> {
    request.validate()?;
    let item = state
        .services
        .installations
        .mark_all_installed(&claims, request_id, item_id, request)
        .await?;
    Ok(Json(item))
}

/// Bulk status override for an item
#[utoipa::path(
    put,
    path = "/requests/{request_id}/items/{item_id}/installation",
    tag = "installations",
    security(("bearer_auth" = [])),
    params(
        ("request_id" = Uuid, Path, description = "Request ID"),
        ("item_id" = Uuid, Path, description = "Request item ID")
    ),
    request_body = UpdateItemInstallation,
    responses(
        (status = 200, description = "Item installation updated", body = RequestItem),
        (status = 422, description = "Problem status requires a comment")
    )
)]
pub async fn update_item_installation(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((request_id, item_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateItemInstallation>,
) -> AppResult<Json<RequestItem>> {
    request.validate()?;
    let item = state
        .services
        .installations
        .update_item_installation(&claims, request_id, item_id, request)
        .await?;
    Ok(Json(item))
}
