//! Shared domain enums and the status-reconciliation formulas

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// RequestStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of an installation request
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "request_status", rename_all = "snake_case")]
pub enum RequestStatus {
    New,
    InProgress,
    Installed,
    Expired,
    Closed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::New => "new",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Installed => "installed",
            RequestStatus::Expired => "expired",
            RequestStatus::Closed => "closed",
        }
    }

    /// Allowed manual transitions (fixed table)
    pub fn allowed_transitions(&self) -> &'static [RequestStatus] {
        match self {
            RequestStatus::New => &[RequestStatus::InProgress, RequestStatus::Closed],
            RequestStatus::InProgress => &[
                RequestStatus::Installed,
                RequestStatus::Expired,
                RequestStatus::Closed,
            ],
            RequestStatus::Installed => &[RequestStatus::Expired],
            RequestStatus::Expired => &[],
            RequestStatus::Closed => &[],
        }
    }

    pub fn can_transition_to(&self, to: RequestStatus) -> bool {
        self.allowed_transitions().contains(&to)
    }

    /// Check a manual transition against the table, erroring with both states
    pub fn check_transition(&self, to: RequestStatus) -> AppResult<()> {
        if self.can_transition_to(to) {
            Ok(())
        } else {
            Err(AppError::InvalidTransition {
                from: self.as_str().to_string(),
                to: to.as_str().to_string(),
            })
        }
    }

    /// Terminal for automatic reconciliation (never rewritten by the cascade)
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Closed | RequestStatus::Expired)
    }

    /// A request is editable by its teacher only before installation completes
    pub fn is_editable(&self) -> bool {
        !matches!(
            self,
            RequestStatus::Installed | RequestStatus::Expired | RequestStatus::Closed
        )
    }

    pub fn can_be_closed(&self) -> bool {
        matches!(self, RequestStatus::New | RequestStatus::InProgress)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// InstallationStatus
// ---------------------------------------------------------------------------

/// Installation status of one software item within a request
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "installation_status", rename_all = "snake_case")]
pub enum InstallationStatus {
    Pending,
    AllInstalled,
    PartiallyInstalled,
    Problem,
    Changed,
}

impl InstallationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallationStatus::Pending => "pending",
            InstallationStatus::AllInstalled => "all_installed",
            InstallationStatus::PartiallyInstalled => "partially_installed",
            InstallationStatus::Problem => "problem",
            InstallationStatus::Changed => "changed",
        }
    }

    /// Derive the installation status from room counts and the explicit pin.
    ///
    /// A pinned item keeps its pinned status regardless of room counts; an
    /// unpinned item is a pure function of (total rooms, installed rooms).
    pub fn compute(total_rooms: i64, installed_rooms: i64, pin: Option<StatusPin>) -> Self {
        match pin {
            Some(StatusPin::Problem) => InstallationStatus::Problem,
            Some(StatusPin::Changed) => InstallationStatus::Changed,
            None => {
                if total_rooms == 0 || installed_rooms == 0 {
                    InstallationStatus::Pending
                } else if installed_rooms == total_rooms {
                    InstallationStatus::AllInstalled
                } else {
                    InstallationStatus::PartiallyInstalled
                }
            }
        }
    }
}

impl std::fmt::Display for InstallationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StatusPin
// ---------------------------------------------------------------------------

/// Explicit override pinning a request item to problem/changed.
///
/// Stored as its own column so a comment added for an unrelated reason can
/// never be mistaken for a pinned problem.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "status_pin", rename_all = "snake_case")]
pub enum StatusPin {
    Problem,
    Changed,
}

// ---------------------------------------------------------------------------
// AttestationStatus
// ---------------------------------------------------------------------------

/// Status of a yearly re-attestation
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "attestation_status", rename_all = "snake_case")]
pub enum AttestationStatus {
    Pending,
    Confirmed,
    Expired,
    NotRequired,
}

impl AttestationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttestationStatus::Pending => "pending",
            AttestationStatus::Confirmed => "confirmed",
            AttestationStatus::Expired => "expired",
            AttestationStatus::NotRequired => "not_required",
        }
    }
}

impl std::fmt::Display for AttestationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RoomType
// ---------------------------------------------------------------------------

/// Room ownership model
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "room_type", rename_all = "snake_case")]
pub enum RoomType {
    Departmental,
    Shared,
}

// ---------------------------------------------------------------------------
// UserRole
// ---------------------------------------------------------------------------

/// User roles
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRole {
    Teacher,
    DepartmentHead,
    RoomManager,
    ItService,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Teacher => "teacher",
            UserRole::DepartmentHead => "department_head",
            UserRole::RoomManager => "room_manager",
            UserRole::ItService => "it_service",
            UserRole::Admin => "admin",
        }
    }

    pub fn can_create_request(&self) -> bool {
        matches!(self, UserRole::Teacher | UserRole::Admin)
    }

    pub fn can_view_all_requests(&self) -> bool {
        matches!(self, UserRole::ItService | UserRole::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// HistoryAction
// ---------------------------------------------------------------------------

/// Action kinds recorded in the audit trail
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "history_action", rename_all = "snake_case")]
pub enum HistoryAction {
    RequestCreated,
    RequestUpdated,
    RequestClosed,
    StatusChanged,
    InstallationStatusChanged,
    Installed,
    Uninstalled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_pending_when_no_rooms_or_none_installed() {
        assert_eq!(
            InstallationStatus::compute(0, 0, None),
            InstallationStatus::Pending
        );
        assert_eq!(
            InstallationStatus::compute(3, 0, None),
            InstallationStatus::Pending
        );
    }

    #[test]
    fn compute_all_installed_when_counts_match() {
        assert_eq!(
            InstallationStatus::compute(2, 2, None),
            InstallationStatus::AllInstalled
        );
    }

    #[test]
    fn compute_partial_otherwise() {
        assert_eq!(
            InstallationStatus::compute(3, 1, None),
            InstallationStatus::PartiallyInstalled
        );
    }

    #[test]
    fn compute_formula_over_count_grid() {
        for total in 0..=6i64 {
            for installed in 0..=total {
                let status = InstallationStatus::compute(total, installed, None);
                let expected = if total == 0 || installed == 0 {
                    InstallationStatus::Pending
                } else if installed == total {
                    InstallationStatus::AllInstalled
                } else {
                    InstallationStatus::PartiallyInstalled
                };
                assert_eq!(status, expected, "total={} installed={}", total, installed);
            }
        }
    }

    #[test]
    fn pin_wins_over_counts() {
        for total in 0..=4i64 {
            for installed in 0..=total {
                assert_eq!(
                    InstallationStatus::compute(total, installed, Some(StatusPin::Problem)),
                    InstallationStatus::Problem
                );
                assert_eq!(
                    InstallationStatus::compute(total, installed, Some(StatusPin::Changed)),
                    InstallationStatus::Changed
                );
            }
        }
    }

    #[test]
    fn transition_table_allows_only_listed_pairs() {
        use RequestStatus::*;
        let all = [New, InProgress, Installed, Expired, Closed];
        let allowed = [
            (New, InProgress),
            (New, Closed),
            (InProgress, Installed),
            (InProgress, Expired),
            (InProgress, Closed),
            (Installed, Expired),
        ];
        for from in all {
            for to in all {
                let expected = allowed.contains(&(from, to));
                assert_eq!(from.can_transition_to(to), expected, "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn check_transition_names_both_states() {
        let err = RequestStatus::Installed
            .check_transition(RequestStatus::New)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("installed"), "{}", msg);
        assert!(msg.contains("new"), "{}", msg);
    }

    #[test]
    fn terminal_states_for_reconciliation() {
        assert!(RequestStatus::Closed.is_terminal());
        assert!(RequestStatus::Expired.is_terminal());
        assert!(!RequestStatus::Installed.is_terminal());
        assert!(!RequestStatus::New.is_terminal());
    }
}
