//! Installation request, request items, and per-room installation rows

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::{InstallationStatus, RequestStatus, StatusPin};
use super::room::RoomShort;
use super::software::Software;

/// Installation request from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Request {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub desired_date: Option<NaiveDate>,
    /// Starting year of the academic year, "YYYY"
    pub academic_year: String,
    pub status: RequestStatus,
    pub comment: Option<String>,
    pub closing_comment: Option<String>,
    pub closed_at: Option<DateTime<Utc>>,
    pub expires_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One software entry within a request
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RequestItem {
    pub id: Uuid,
    pub request_id: Uuid,
    pub software_id: Uuid,
    pub status: InstallationStatus,
    /// Explicit override pinning the item to problem/changed
    pub status_pin: Option<StatusPin>,
    pub installed_at: Option<DateTime<Utc>>,
    pub comment: Option<String>,
    pub status_changed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// One (item, room) installation assignment
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RoomInstallation {
    pub id: Uuid,
    pub request_item_id: Uuid,
    pub room_id: Uuid,
    pub installed: bool,
    /// Set exactly when `installed` is true
    pub installed_at: Option<DateTime<Utc>>,
    pub assigned_at: DateTime<Utc>,
    pub comment: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Request item with its software and room installations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RequestItemDetails {
    #[serde(flatten)]
    pub item: RequestItem,
    pub software: Software,
    pub rooms: Vec<RoomInstallationDetails>,
}

/// Room installation joined with its room
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoomInstallationDetails {
    #[serde(flatten)]
    pub installation: RoomInstallation,
    pub room: RoomShort,
}

/// Request with every item, software, and room expanded
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RequestDetails {
    #[serde(flatten)]
    pub request: Request,
    pub items: Vec<RequestItemDetails>,
}

/// Per-software installation progress within a request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InstallationSummary {
    pub item_id: Uuid,
    pub software: Software,
    pub status: InstallationStatus,
    pub total_rooms: i64,
    pub installed_rooms: i64,
    pub rooms_installed: Vec<RoomShort>,
    pub rooms_pending: Vec<RoomShort>,
}

/// Stored vs computed status, per item and for the request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConsistencyReport {
    pub request_id: Uuid,
    pub request_status_stored: RequestStatus,
    pub request_status_computed: RequestStatus,
    pub consistent: bool,
    pub items: Vec<ItemConsistency>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemConsistency {
    pub item_id: Uuid,
    pub software_id: Uuid,
    pub stored: InstallationStatus,
    pub computed: InstallationStatus,
    pub consistent: bool,
}

/// One software + its target rooms, within a create-request payload
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRequestItem {
    pub software_id: Uuid,
    #[validate(length(min = 1, message = "At least one room is required"))]
    pub room_ids: Vec<Uuid>,
}

/// Create request payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRequest {
    pub teacher_id: Uuid,
    pub desired_date: Option<NaiveDate>,
    /// Starting year of the academic year, "YYYY" or "current"
    pub academic_year: String,
    pub comment: Option<String>,
    #[validate(nested, length(min = 1, message = "At least one software item is required"))]
    pub items: Vec<CreateRequestItem>,
}

/// Update request payload (editable fields only)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRequest {
    pub desired_date: Option<NaiveDate>,
    pub academic_year: Option<String>,
    pub comment: Option<String>,
}

/// Close request payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CloseRequest {
    #[validate(length(min = 3, message = "Closing comment must be at least 3 characters"))]
    pub comment: String,
}

/// Request list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct RequestQuery {
    pub status: Option<RequestStatus>,
    pub academic_year: Option<String>,
    pub teacher_id: Option<Uuid>,
}

/// Request item list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct RequestItemQuery {
    pub request_id: Option<Uuid>,
    pub software_id: Option<Uuid>,
    pub status: Option<InstallationStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Update a single room installation row
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoomInstallation {
    pub installed: bool,
    /// Defaults to now when `installed` is true and no date is given
    pub installed_at: Option<DateTime<Utc>>,
    pub comment: Option<String>,
}

/// Flip every room installation of an item to installed
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MarkAllInstalled {
    /// Shared installation date, defaults to now
    pub installed_at: Option<DateTime<Utc>>,
    pub comment: Option<String>,
}

/// Bulk installation-status override for an item
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateItemInstallation {
    /// Explicit status skips recomputation; absent means recompute
    pub status: Option<InstallationStatus>,
    pub comment: Option<String>,
}
