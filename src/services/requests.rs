//! Installation request workflow service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        academic_year::AcademicYear,
        enums::{HistoryAction, RequestStatus},
        history::NewHistoryEntry,
        request::{
            CloseRequest, ConsistencyReport, CreateRequest, InstallationSummary, Request,
            RequestDetails, RequestQuery, UpdateRequest,
        },
        user::UserClaims,
    },
    repository::Repository,
    services::{history::HistoryRecorder, sync},
};

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
    history: Option<HistoryRecorder>,
}

impl RequestsService {
    pub fn new(repository: Repository, history: Option<HistoryRecorder>) -> Self {
        Self { repository, history }
    }

    async fn record(&self, entry: NewHistoryEntry) {
        if let Some(history) = &self.history {
            history.record(entry).await;
        }
    }

    /// Owner (the request's teacher) or a role that sees every request
    async fn check_access(&self, actor: &UserClaims, request: &Request) -> AppResult<()> {
        if actor.role.can_view_all_requests() {
            return Ok(());
        }
        let teacher = self.repository.users.get_teacher(request.teacher_id).await?;
        if teacher.user_id == actor.user_id {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "You do not own this request".to_string(),
            ))
        }
    }

    /// Owner only; admins may act on a teacher's behalf
    async fn check_ownership(&self, actor: &UserClaims, request: &Request) -> AppResult<()> {
        if actor.is_admin() {
            return Ok(());
        }
        let teacher = self.repository.users.get_teacher(request.teacher_id).await?;
        if teacher.user_id == actor.user_id {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "You do not own this request".to_string(),
            ))
        }
    }

    /// Create a request with its items and room installations
    pub async fn create(&self, actor: &UserClaims, mut dto: CreateRequest) -> AppResult<Request> {
        actor.require_request_creation()?;

        let teacher = self.repository.users.get_teacher(dto.teacher_id).await?;
        if !actor.is_admin() && teacher.user_id != actor.user_id {
            return Err(AppError::Authorization(
                "Teachers can only create requests for themselves".to_string(),
            ));
        }

        // Normalize "current" and validate the range
        let year = AcademicYear::from_year(&dto.academic_year)?;
        dto.academic_year = year.year().to_string();

        for item in &dto.items {
            let software = self.repository.software.get_by_id(item.software_id).await?;
            if !software.active {
                return Err(AppError::aggregate_not_found("Software", item.software_id));
            }
        }

        let mut room_ids: Vec<Uuid> = dto
            .items
            .iter()
            .flat_map(|item| item.room_ids.iter().copied())
            .collect();
        room_ids.sort_unstable();
        room_ids.dedup();
        let existing = self.repository.rooms.count_existing(&room_ids).await?;
        if existing != room_ids.len() as i64 {
            return Err(AppError::NotFound(
                "One or more target rooms do not exist".to_string(),
            ));
        }

        let request = self.repository.requests.create(&dto).await?;

        // One audit entry per item, however many the request carries
        for item in self.repository.requests.items_of_request(request.id).await? {
            self.record(
                NewHistoryEntry::new(request.id, actor.user_id, HistoryAction::RequestCreated)
                    .item(item.id, item.software_id)
                    .comment(dto.comment.clone()),
            )
            .await;
        }

        Ok(request)
    }

    /// List requests: teachers see their own, IT service and admins see all
    pub async fn list(&self, actor: &UserClaims, mut query: RequestQuery) -> AppResult<Vec<Request>> {
        if !actor.role.can_view_all_requests() {
            let teacher = self
                .repository
                .users
                .get_teacher_by_user(actor.user_id)
                .await?
                .ok_or_else(|| {
                    AppError::Authorization("No teacher profile for this account".to_string())
                })?;
            query.teacher_id = Some(teacher.id);
        }
        self.repository.requests.list(&query).await
    }

    /// Open requests (new or in progress) for the IT queue
    pub async fn list_open(&self, actor: &UserClaims) -> AppResult<Vec<Request>> {
        actor.require_it_service()?;
        self.repository.requests.list_open().await
    }

    pub async fn get(&self, actor: &UserClaims, id: Uuid) -> AppResult<RequestDetails> {
        let details = self.repository.requests.get_details(id).await?;
        self.check_access(actor, &details.request).await?;
        Ok(details)
    }

    /// Update a request's editable fields
    pub async fn update(
        &self,
        actor: &UserClaims,
        id: Uuid,
        mut dto: UpdateRequest,
    ) -> AppResult<Request> {
        let request = self.repository.requests.get_by_id(id).await?;
        self.check_ownership(actor, &request).await?;
        self.check_editable(&request).await?;

        if let Some(year) = &dto.academic_year {
            let year = AcademicYear::from_year(year)?;
            dto.academic_year = Some(year.year().to_string());
        }

        let updated = self.repository.requests.update(id, &dto).await?;
        self.record(
            NewHistoryEntry::new(id, actor.user_id, HistoryAction::RequestUpdated)
                .comment(dto.comment.clone()),
        )
        .await;
        Ok(updated)
    }

    /// Close a request with a mandatory closing comment
    pub async fn close(&self, actor: &UserClaims, id: Uuid, dto: CloseRequest) -> AppResult<Request> {
        let request = self.repository.requests.get_by_id(id).await?;
        self.check_ownership(actor, &request).await?;

        if !request.status.can_be_closed() {
            return Err(AppError::BusinessRule(format!(
                "Only new or in-progress requests can be closed (current: {})",
                request.status
            )));
        }

        let closed = self.repository.requests.close(id, &dto.comment).await?;
        self.record(
            NewHistoryEntry::new(id, actor.user_id, HistoryAction::RequestClosed)
                .request_statuses(request.status, RequestStatus::Closed)
                .comment(Some(dto.comment)),
        )
        .await;
        Ok(closed)
    }

    /// Manual transition into in_progress (IT service picks up the request)
    pub async fn mark_in_progress(&self, actor: &UserClaims, id: Uuid) -> AppResult<Request> {
        actor.require_it_service()?;
        let request = self.repository.requests.get_by_id(id).await?;
        request.status.check_transition(RequestStatus::InProgress)?;

        let updated = self
            .repository
            .requests
            .set_status(id, RequestStatus::InProgress)
            .await?;
        self.record(
            NewHistoryEntry::new(id, actor.user_id, HistoryAction::StatusChanged)
                .request_statuses(request.status, RequestStatus::InProgress),
        )
        .await;
        Ok(updated)
    }

    /// Per-software installation progress
    pub async fn installation_summary(
        &self,
        actor: &UserClaims,
        id: Uuid,
    ) -> AppResult<Vec<InstallationSummary>> {
        let request = self.repository.requests.get_by_id(id).await?;
        self.check_access(actor, &request).await?;
        self.repository.requests.installation_summary(id).await
    }

    /// Force a full reconciliation of every item and the request
    pub async fn resync(&self, actor: &UserClaims, id: Uuid) -> AppResult<RequestDetails> {
        actor.require_it_service()?;
        self.repository.requests.get_by_id(id).await?;

        let mut tx = self.repository.pool.begin().await?;
        sync::resync_request(&mut *tx, id).await?;
        tx.commit().await?;

        self.repository.requests.get_details(id).await
    }

    /// Read-only stored-vs-computed status report
    pub async fn check_consistency(
        &self,
        actor: &UserClaims,
        id: Uuid,
    ) -> AppResult<ConsistencyReport> {
        actor.require_it_service()?;
        sync::check_consistency(&self.repository.pool, id).await
    }

    /// Editable while the status allows it and no item has fully landed
    async fn check_editable(&self, request: &Request) -> AppResult<()> {
        if !request.status.is_editable() {
            return Err(AppError::BusinessRule(format!(
                "Request in status {} can no longer be modified",
                request.status
            )));
        }
        let statuses = self.repository.requests.item_statuses(request.id).await?;
        if !statuses.is_empty()
            && statuses
                .iter()
                .all(|s| *s == crate::models::enums::InstallationStatus::AllInstalled)
        {
            return Err(AppError::BusinessRule(
                "Request can no longer be modified: all software is installed".to_string(),
            ));
        }
        Ok(())
    }
}
