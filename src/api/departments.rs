//! Department management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::department::{CreateDepartment, Department, UpdateDepartment},
    AppState,
};

use super::AuthenticatedUser;

/// List departments
#[utoipa::path(
    get,
    path = "/departments",
    tag = "departments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All departments", body = Vec<Department>)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Department>>> {
    let departments = state.services.departments.list().await?;
    Ok(Json(departments))
}

/// Get a department
#[utoipa::path(
    get,
    path = "/departments/{id}",
    tag = "departments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department", body = Department),
        (status = 404, description = "Department not found")
    )
)]
pub async fn get(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Department>> {
    let department = state.services.departments.get(id).await?;
    Ok(Json(department))
}

/// Create a department
#[utoipa::path(
    post,
    path = "/departments",
    tag = "departments",
    security(("bearer_auth" = [])),
    request_body = CreateDepartment,
    responses(
        (status = 201, description = "Department created", body = Department),
        (status = 409, description = "Name or code already taken")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateDepartment>,
) -> AppResult<(StatusCode, Json<Department>)> {
    claims.require_admin()?;
    request.validate()?;
    let department = state.services.departments.create(request).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

/// Update a department
#[utoipa::path(
    put,
    path = "/departments/{id}",
    tag = "departments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Department ID")),
    request_body = UpdateDepartment,
    responses(
        (status = 200, description = "Department updated", body = Department),
        (status = 404, description = "Department not found"),
        (status = 409, description = "Name or code already taken")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDepartment>,
) -> AppResult<Json<Department>> {
    claims.require_admin()?;
    request.validate()?;
    let department = state.services.departments.update(id, request).await?;
    Ok(Json(department))
}

/// Delete a department
#[utoipa::path(
    delete,
    path = "/departments/{id}",
    tag = "departments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 204, description = "Department deleted"),
        (status = 404, description = "Department not found"),
        (status = 422, description = "Rooms still attached")
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;
    state.services.departments.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
