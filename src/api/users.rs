//! User management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{CreateTeacher, CreateUser, Teacher, UpdateUser, User, UserQuery},
    AppState,
};

use super::AuthenticatedUser;

/// Teacher account response (user + specialization)
#[derive(Serialize, ToSchema)]
pub struct TeacherResponse {
    pub user: User,
    pub teacher: Teacher,
}

/// List users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    params(UserQuery),
    responses(
        (status = 200, description = "All users", body = Vec<User>)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<Vec<User>>> {
    claims.require_admin()?;
    let users = state.services.users.list(&query).await?;
    Ok(Json(users))
}

/// Get a user
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn get(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<User>> {
    claims.require_admin()?;
    let user = state.services.users.get_by_id(id).await?;
    Ok(Json(user))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 409, description = "Email already taken")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    claims.require_admin()?;
    request.validate()?;
    let user = state.services.users.create(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Create a teacher account (user and specialization together)
#[utoipa::path(
    post,
    path = "/users/teachers",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = CreateTeacher,
    responses(
        (status = 201, description = "Teacher created", body = TeacherResponse),
        (status = 409, description = "Email or employee number already taken")
    )
)]
pub async fn create_teacher(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateTeacher>,
) -> AppResult<(StatusCode, Json<TeacherResponse>)> {
    claims.require_admin()?;
    request.validate()?;
    let (user, teacher) = state.services.users.create_teacher(request).await?;
    Ok((StatusCode::CREATED, Json(TeacherResponse { user, teacher })))
}

/// Attach the IT-service specialization to a user
#[utoipa::path(
    post,
    path = "/users/{id}/it-service",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "Specialization attached"),
        (status = 404, description = "User not found"),
        (status = 422, description = "Wrong role or already specialized")
    )
)]
pub async fn create_it_service_member(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;
    state.services.users.create_it_service_member(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Attach the administrator specialization to a user
#[utoipa::path(
    post,
    path = "/users/{id}/administrator",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "Specialization attached"),
        (status = 404, description = "User not found"),
        (status = 422, description = "Wrong role or already specialized")
    )
)]
pub async fn create_administrator(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;
    state.services.users.create_administrator(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Update a user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already taken")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUser>,
) -> AppResult<Json<User>> {
    claims.require_admin()?;
    request.validate()?;
    let user = state.services.users.update(id, request).await?;
    Ok(Json(user))
}

/// Deactivate a user account
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deactivated"),
        (status = 404, description = "User not found")
    )
)]
pub async fn deactivate(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;
    state.services.users.deactivate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
