//! Software catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::software::{CreateSoftware, Software, SoftwareQuery, UpdateSoftware},
    AppState,
};

use super::AuthenticatedUser;

/// List software, filtered by name and active flag
#[utoipa::path(
    get,
    path = "/software",
    tag = "software",
    security(("bearer_auth" = [])),
    params(SoftwareQuery),
    responses(
        (status = 200, description = "Software catalog", body = Vec<Software>)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<SoftwareQuery>,
) -> AppResult<Json<Vec<Software>>> {
    let software = state.services.software.list(&query).await?;
    Ok(Json(software))
}

/// Get a software entry
#[utoipa::path(
    get,
    path = "/software/{id}",
    tag = "software",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Software ID")),
    responses(
        (status = 200, description = "Software", body = Software),
        (status = 404, description = "Software not found")
    )
)]
pub async fn get(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Software>> {
    let software = state.services.software.get(id).await?;
    Ok(Json(software))
}

/// Create a software entry
#[utoipa::path(
    post,
    path = "/software",
    tag = "software",
    security(("bearer_auth" = [])),
    request_body = CreateSoftware,
    responses(
        (status = 201, description = "Software created", body = Software),
        (status = 400, description = "Invalid version"),
        (status = 409, description = "Name and version already taken")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateSoftware>,
) -> AppResult<(StatusCode, Json<Software>)> {
    claims.require_it_service()?;
    request.validate()?;
    let software = state.services.software.create(request).await?;
    Ok((StatusCode::CREATED, Json(software)))
}

/// Update a software entry
#[utoipa::path(
    put,
    path = "/software/{id}",
    tag = "software",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Software ID")),
    request_body = UpdateSoftware,
    responses(
        (status = 200, description = "Software updated", body = Software),
        (status = 404, description = "Software not found"),
        (status = 409, description = "Name and version already taken")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSoftware>,
) -> AppResult<Json<Software>> {
    claims.require_it_service()?;
    request.validate()?;
    let software = state.services.software.update(id, request).await?;
    Ok(Json(software))
}

/// Soft-delete a software entry
#[utoipa::path(
    delete,
    path = "/software/{id}",
    tag = "software",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Software ID")),
    responses(
        (status = 204, description = "Software deactivated"),
        (status = 404, description = "Software not found")
    )
)]
pub async fn deactivate(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_it_service()?;
    state.services.software.deactivate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
