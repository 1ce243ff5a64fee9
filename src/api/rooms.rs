//! Room management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        room::{CreateRoom, Room, RoomDetails, UpdateRoom},
        software::Software,
    },
    AppState,
};

use super::AuthenticatedUser;

#[derive(Deserialize, IntoParams)]
pub struct RoomListQuery {
    /// Restrict to one department
    pub department_id: Option<Uuid>,
}

/// List rooms
#[utoipa::path(
    get,
    path = "/rooms",
    tag = "rooms",
    security(("bearer_auth" = [])),
    params(RoomListQuery),
    responses(
        (status = 200, description = "All rooms", body = Vec<Room>)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<RoomListQuery>,
) -> AppResult<Json<Vec<Room>>> {
    let rooms = state.services.rooms.list(query.department_id).await?;
    Ok(Json(rooms))
}

/// Get a room with its installed software
#[utoipa::path(
    get,
    path = "/rooms/{id}",
    tag = "rooms",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Room", body = RoomDetails),
        (status = 404, description = "Room not found")
    )
)]
pub async fn get(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RoomDetails>> {
    let room = state.services.rooms.get(id).await?;
    Ok(Json(room))
}

/// Create a room
#[utoipa::path(
    post,
    path = "/rooms",
    tag = "rooms",
    security(("bearer_auth" = [])),
    request_body = CreateRoom,
    responses(
        (status = 201, description = "Room created", body = Room),
        (status = 404, description = "Department or software not found"),
        (status = 422, description = "Type and department do not match")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateRoom>,
) -> AppResult<(StatusCode, Json<Room>)> {
    claims.require_admin()?;
    request.validate()?;
    let room = state.services.rooms.create(request).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

/// Update a room
#[utoipa::path(
    put,
    path = "/rooms/{id}",
    tag = "rooms",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Room ID")),
    request_body = UpdateRoom,
    responses(
        (status = 200, description = "Room updated", body = Room),
        (status = 404, description = "Room not found"),
        (status = 422, description = "Type and department do not match")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRoom>,
) -> AppResult<Json<Room>> {
    claims.require_admin()?;
    request.validate()?;
    let room = state.services.rooms.update(id, request).await?;
    Ok(Json(room))
}

/// Delete a room
#[utoipa::path(
    delete,
    path = "/rooms/{id}",
    tag = "rooms",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Room ID")),
    responses(
        (status = 204, description = "Room deleted"),
        (status = 404, description = "Room not found")
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;
    state.services.rooms.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Software currently installed in the room
#[utoipa::path(
    get,
    path = "/rooms/{id}/software",
    tag = "rooms",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Installed software", body = Vec<Software>),
        (status = 404, description = "Room not found")
    )
)]
pub async fn installed_software(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Software>>> {
    let software = state.services.rooms.installed_software(id).await?;
    Ok(Json(software))
}
