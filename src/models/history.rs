//! Append-only audit trail entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::enums::{HistoryAction, InstallationStatus, RequestStatus};

/// Audit trail entry from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub request_id: Uuid,
    pub request_item_id: Option<Uuid>,
    pub software_id: Option<Uuid>,
    /// Who performed the action
    pub user_id: Uuid,
    pub action: HistoryAction,
    pub old_request_status: Option<RequestStatus>,
    pub new_request_status: Option<RequestStatus>,
    pub old_installation_status: Option<InstallationStatus>,
    pub new_installation_status: Option<InstallationStatus>,
    pub comment: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// New audit trail entry, before insertion
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub request_id: Uuid,
    pub request_item_id: Option<Uuid>,
    pub software_id: Option<Uuid>,
    pub user_id: Uuid,
    pub action: HistoryAction,
    pub old_request_status: Option<RequestStatus>,
    pub new_request_status: Option<RequestStatus>,
    pub old_installation_status: Option<InstallationStatus>,
    pub new_installation_status: Option<InstallationStatus>,
    pub comment: Option<String>,
}

impl NewHistoryEntry {
    pub fn new(request_id: Uuid, user_id: Uuid, action: HistoryAction) -> Self {
        Self {
            request_id,
            request_item_id: None,
            software_id: None,
            user_id,
            action,
            old_request_status: None,
            new_request_status: None,
            old_installation_status: None,
            new_installation_status: None,
            comment: None,
        }
    }

    pub fn item(mut self, item_id: Uuid, software_id: Uuid) -> Self {
        self.request_item_id = Some(item_id);
        self.software_id = Some(software_id);
        self
    }

    pub fn request_statuses(mut self, old: RequestStatus, new: RequestStatus) -> Self {
        self.old_request_status = Some(old);
        self.new_request_status = Some(new);
        self
    }

    pub fn installation_statuses(
        mut self,
        old: InstallationStatus,
        new: InstallationStatus,
    ) -> Self {
        self.old_installation_status = Some(old);
        self.new_installation_status = Some(new);
        self
    }

    pub fn comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }
}

/// History list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct HistoryQuery {
    pub request_id: Option<Uuid>,
    pub software_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub action: Option<HistoryAction>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
