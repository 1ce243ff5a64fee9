//! Annual re-attestation model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::AttestationStatus;

/// Yearly re-attestation from database (one per request)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Attestation {
    pub id: Uuid,
    pub request_id: Uuid,
    /// Starting year of the academic year, "YYYY"
    pub academic_year: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub status: AttestationStatus,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub comment: Option<String>,
    pub reminder_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Create attestation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAttestation {
    pub request_id: Uuid,
    /// Starting year of the academic year, "YYYY" or "current"
    pub academic_year: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Only `not_required` is honored here; anything else defaults to pending
    pub status: Option<AttestationStatus>,
    pub comment: Option<String>,
}

/// Confirm attestation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ConfirmAttestation {
    pub comment: Option<String>,
}

/// Attestation list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AttestationQuery {
    pub status: Option<AttestationStatus>,
    pub academic_year: Option<String>,
}

/// Result of a bulk attestation operation (campaign, expiry sweep)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkAttestationResult {
    pub affected: u64,
}
