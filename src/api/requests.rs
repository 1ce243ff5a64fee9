//! Installation request endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::request::{
        CloseRequest, ConsistencyReport, CreateRequest, InstallationSummary, Request,
        RequestDetails, RequestQuery, UpdateRequest,
    },
    AppState,
};

use super::AuthenticatedUser;

/// List requests (teachers see their own, IT service sees all)
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(RequestQuery),
    responses(
        (status = 200, description = "Requests", body = Vec<Request>)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<RequestQuery>,
) -> AppResult<Json<Vec<Request>>> {
    let requests = state.services.requests.list(&claims, query).await?;
    Ok(Json(requests))
}

/// Open requests (new or in progress) for the IT queue
#[utoipa::path(
    get,
    path = "/requests/open",
    tag = "requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Open requests", body = Vec<Request>),
        (status = 403, description = "IT service role required")
    )
)]
pub async fn list_open(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Request>>> {
    let requests = state.services.requests.list_open(&claims).await?;
    Ok(Json(requests))
}

/// Get a request with items, software, and rooms
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request", body = RequestDetails),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn get(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RequestDetails>> {
    let details = state.services.requests.get(&claims, id).await?;
    Ok(Json(details))
}

/// Create an installation request
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    request_body = CreateRequest,
    responses(
        (status = 201, description = "Request created", body = Request),
        (status = 400, description = "Invalid academic year"),
        (status = 404, description = "Teacher, software, or room not found")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateRequest>,
) -> AppResult<(StatusCode, Json<Request>)> {
    request.validate()?;
    let created = state.services.requests.create(&claims, request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a request's editable fields
#[utoipa::path(
    put,
    path = "/requests/{id}",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = UpdateRequest,
    responses(
        (status = 200, description = "Request updated", body = Request),
        (status = 403, description = "Not the owner"),
        (status = 422, description = "Request no longer editable")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRequest>,
) -> AppResult<Json<Request>> {
    request.validate()?;
    let updated = state.services.requests.update(&claims, id, request).await?;
    Ok(Json(updated))
}

/// Close a request with a closing comment
#[utoipa::path(
    post,
    path = "/requests/{id}/close",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = CloseRequest,
    responses(
        (status = 200, description = "Request closed", body = Request),
        (status = 403, description = "Not the owner"),
        (status = 422, description = "Request cannot be closed")
    )
)]
pub async fn close(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<CloseRequest>,
) -> AppResult<Json<Request>> {
    request.validate()?;
    let closed = state.services.requests.close(&claims, id, request).await?;
    Ok(Json(closed))
}

/// Mark a request as picked up by the IT service
#[utoipa::path(
    post,
    path = "/requests/{id}/in-progress",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request in progress", body = Request),
        (status = 422, description = "Transition not allowed")
    )
)]
pub async fn mark_in_progress(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Request>> {
    let updated = state.services.requests.mark_in_progress(&claims, id).await?;
    Ok(Json(updated))
}

/// Per-software installation progress
#[utoipa::path(
    get,
    path = "/requests/{id}/summary",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Installation summary", body = Vec<InstallationSummary>),
        (status = 404, description = "Request not found")
    )
)]
pub async fn installation_summary(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<InstallationSummary>>> {
    let summary = state
        .services
        .requests
        .installation_summary(&claims, id)
        .await?;
    Ok(Json(summary))
}

/// Force a full status reconciliation
#[utoipa::path(
    post,
    path = "/requests/{id}/resync",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request resynced", body = RequestDetails),
        (status = 403, description = "IT service role required")
    )
)]
pub async fn resync(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RequestDetails>> {
    let details = state.services.requests.resync(&claims, id).await?;
    Ok(Json(details))
}

/// Stored-vs-computed status report, read only
#[utoipa::path(
    get,
    path = "/requests/{id}/consistency",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Consistency report", body = ConsistencyReport),
        (status = 404, description = "Request not found")
    )
)]
pub async fn check_consistency(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ConsistencyReport>> {
    let report = state
        .services
        .requests
        .check_consistency(&claims, id)
        .await?;
    Ok(Json(report))
}
