//! Audit trail recording and queries

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::history::{HistoryEntry, HistoryQuery, NewHistoryEntry},
    repository::Repository,
};

/// Optional collaborator writing audit trail entries.
///
/// Entries are written after the main transaction commits; an insert failure
/// is logged and swallowed so the audit trail can never fail a mutation.
#[derive(Clone)]
pub struct HistoryRecorder {
    repository: Repository,
}

impl HistoryRecorder {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Append an entry, never propagating failures
    pub async fn record(&self, entry: NewHistoryEntry) {
        if let Err(err) = self.repository.history.insert(&entry).await {
            tracing::warn!(
                request_id = %entry.request_id,
                action = ?entry.action,
                error = %err,
                "failed to record history entry"
            );
        }
    }
}

/// Read-only audit trail queries
#[derive(Clone)]
pub struct HistoryService {
    repository: Repository,
}

impl HistoryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &HistoryQuery) -> AppResult<Vec<HistoryEntry>> {
        self.repository.history.list(query).await
    }

    /// Full trail of one request, oldest first
    pub async fn list_by_request(&self, request_id: Uuid) -> AppResult<Vec<HistoryEntry>> {
        self.repository.requests.get_by_id(request_id).await?;
        self.repository.history.list_by_request(request_id).await
    }
}
