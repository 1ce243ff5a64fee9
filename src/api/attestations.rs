//! Annual re-attestation endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::attestation::{
        Attestation, AttestationQuery, BulkAttestationResult, ConfirmAttestation,
        CreateAttestation,
    },
    AppState,
};

use super::AuthenticatedUser;

/// Campaign request: one attestation per installed request of the year
#[derive(Deserialize, ToSchema)]
pub struct CampaignRequest {
    /// Starting year of the academic year, "YYYY" or "current"
    pub academic_year: String,
}

/// List attestations
#[utoipa::path(
    get,
    path = "/attestations",
    tag = "attestations",
    security(("bearer_auth" = [])),
    params(AttestationQuery),
    responses(
        (status = 200, description = "Attestations", body = Vec<Attestation>)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<AttestationQuery>,
) -> AppResult<Json<Vec<Attestation>>> {
    let attestations = state.services.attestations.list(&query).await?;
    Ok(Json(attestations))
}

/// Get an attestation
#[utoipa::path(
    get,
    path = "/attestations/{id}",
    tag = "attestations",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Attestation ID")),
    responses(
        (status = 200, description = "Attestation", body = Attestation),
        (status = 404, description = "Attestation not found")
    )
)]
pub async fn get(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Attestation>> {
    let attestation = state.services.attestations.get(id).await?;
    Ok(Json(attestation))
}

/// Get the attestation of a request
#[utoipa::path(
    get,
    path = "/requests/{id}/attestation",
    tag = "attestations",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Attestation", body = Attestation),
        (status = 404, description = "Request or attestation not found")
    )
)]
pub async fn get_by_request(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Attestation>> {
    let attestation = state.services.attestations.get_by_request(id).await?;
    Ok(Json(attestation))
}

/// Create an attestation for a request
#[utoipa::path(
    post,
    path = "/attestations",
    tag = "attestations",
    security(("bearer_auth" = [])),
    request_body = CreateAttestation,
    responses(
        (status = 201, description = "Attestation created", body = Attestation),
        (status = 409, description = "Request already has an attestation"),
        (status = 422, description = "Period outside the academic year")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateAttestation>,
) -> AppResult<(StatusCode, Json<Attestation>)> {
    request.validate()?;
    let attestation = state.services.attestations.create(&claims, request).await?;
    Ok((StatusCode::CREATED, Json(attestation)))
}

/// Confirm a pending attestation
#[utoipa::path(
    post,
    path = "/attestations/{id}/confirm",
    tag = "attestations",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Attestation ID")),
    request_body = ConfirmAttestation,
    responses(
        (status = 200, description = "Attestation confirmed", body = Attestation),
        (status = 403, description = "Not the requesting teacher"),
        (status = 422, description = "Attestation is not pending")
    )
)]
pub async fn confirm(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ConfirmAttestation>,
) -> AppResult<Json<Attestation>> {
    let attestation = state
        .services
        .attestations
        .confirm(&claims, id, request)
        .await?;
    Ok(Json(attestation))
}

/// Expire one attestation (confirmed ones are left untouched)
#[utoipa::path(
    post,
    path = "/attestations/{id}/expire",
    tag = "attestations",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Attestation ID")),
    responses(
        (status = 200, description = "Attestation state", body = Attestation),
        (status = 404, description = "Attestation not found")
    )
)]
pub async fn expire(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Attestation>> {
    let attestation = state.services.attestations.expire(&claims, id).await?;
    Ok(Json(attestation))
}

/// Expire every pending attestation past its period end (cron entry point)
#[utoipa::path(
    post,
    path = "/attestations/expire-due",
    tag = "attestations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Expired count", body = BulkAttestationResult)
    )
)]
pub async fn expire_due(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<BulkAttestationResult>> {
    let result = state.services.attestations.expire_due(&claims).await?;
    Ok(Json(result))
}

/// Pending attestations inside the reminder window
#[utoipa::path(
    get,
    path = "/attestations/reminders",
    tag = "attestations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Attestations due for a reminder", body = Vec<Attestation>)
    )
)]
pub async fn list_due_for_reminder(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Attestation>>> {
    let attestations = state
        .services
        .attestations
        .list_due_for_reminder(&claims)
        .await?;
    Ok(Json(attestations))
}

/// Mark a reminder as sent
#[utoipa::path(
    post,
    path = "/attestations/{id}/reminder-sent",
    tag = "attestations",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Attestation ID")),
    responses(
        (status = 200, description = "Reminder recorded", body = Attestation),
        (status = 404, description = "Attestation not found")
    )
)]
pub async fn mark_reminder_sent(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Attestation>> {
    let attestation = state
        .services
        .attestations
        .mark_reminder_sent(&claims, id)
        .await?;
    Ok(Json(attestation))
}

/// Launch the yearly attestation campaign
#[utoipa::path(
    post,
    path = "/attestations/campaign",
    tag = "attestations",
    security(("bearer_auth" = [])),
    request_body = CampaignRequest,
    responses(
        (status = 200, description = "Created count", body = BulkAttestationResult)
    )
)]
pub async fn run_campaign(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CampaignRequest>,
) -> AppResult<Json<BulkAttestationResult>> {
    let result = state
        .services
        .attestations
        .run_campaign(&claims, &request.academic_year)
        .await?;
    Ok(Json(result))
}
