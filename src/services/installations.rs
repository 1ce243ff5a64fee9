//! Per-room and per-item installation tracking

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{HistoryAction, InstallationStatus, StatusPin},
        history::NewHistoryEntry,
        request::{
            MarkAllInstalled, RequestItem, RequestItemQuery, RoomInstallation,
            UpdateItemInstallation, UpdateRoomInstallation,
        },
        user::UserClaims,
    },
    repository::Repository,
    services::{history::HistoryRecorder, sync},
};

#[derive(Clone)]
pub struct InstallationsService {
    repository: Repository,
    history: Option<HistoryRecorder>,
}

impl InstallationsService {
    pub fn new(repository: Repository, history: Option<HistoryRecorder>) -> Self {
        Self { repository, history }
    }

    async fn record(&self, entry: NewHistoryEntry) {
        if let Some(history) = &self.history {
            history.record(entry).await;
        }
    }

    pub async fn list_items(
        &self,
        actor: &UserClaims,
        query: &RequestItemQuery,
    ) -> AppResult<Vec<RequestItem>> {
        actor.require_it_service()?;
        self.repository.requests.list_items(query).await
    }

    pub async fn get_item(&self, actor: &UserClaims, item_id: Uuid) -> AppResult<RequestItem> {
        actor.require_it_service()?;
        self.repository.requests.get_item(item_id).await
    }

    /// Item must exist and belong to the request
    async fn load_item(&self, request_id: Uuid, item_id: Uuid) -> AppResult<RequestItem> {
        self.repository.requests.get_by_id(request_id).await?;
        let item = self.repository.requests.get_item(item_id).await?;
        if item.request_id != request_id {
            return Err(AppError::NotFound(format!(
                "Request item {} does not belong to request {}",
                item_id, request_id
            )));
        }
        Ok(item)
    }

    /// Update one room installation and cascade the recomputation
    pub async fn update_room_installation(
        &self,
        actor: &UserClaims,
        request_id: Uuid,
        item_id: Uuid,
        room_id: Uuid,
        dto: UpdateRoomInstallation,
    ) -> AppResult<RoomInstallation> {
        actor.require_it_service()?;
        let item = self.load_item(request_id, item_id).await?;
        self.repository
            .requests
            .get_room_installation(item_id, room_id)
            .await?;

        // installed without a date means now; uninstalled always clears it
        let installed_at = if dto.installed {
            Some(dto.installed_at.unwrap_or_else(Utc::now))
        } else {
            None
        };

        let mut tx = self.repository.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE room_installations
            SET installed = $3, installed_at = $4,
                comment = COALESCE($5, comment), updated_at = NOW()
            WHERE request_item_id = $1 AND room_id = $2
            "#,
        )
        .bind(item_id)
        .bind(room_id)
        .bind(dto.installed)
        .bind(installed_at)
        .bind(&dto.comment)
        .execute(&mut *tx)
        .await?;

        let item_change = sync::recompute_item_status(&mut *tx, item_id).await?;
        let request_change = sync::recompute_request_status(&mut *tx, request_id).await?;
        tx.commit().await?;

        let action = if dto.installed {
            HistoryAction::Installed
        } else {
            HistoryAction::Uninstalled
        };
        let mut entry = NewHistoryEntry::new(request_id, actor.user_id, action)
            .item(item_id, item.software_id)
            .comment(dto.comment.clone());
        if let Some((old, new)) = item_change {
            entry = entry.installation_statuses(old, new);
        }
        if let Some((old, new)) = request_change {
            entry = entry.request_statuses(old, new);
        }
        self.record(entry).await;

        self.repository
            .requests
            .get_room_installation(item_id, room_id)
            .await
    }

    /// Flip every room installation of an item to installed
    pub async fn mark_all_installed(
        &self,
        actor: &UserClaims,
        request_id: Uuid,
        item_id: Uuid,
        dto: MarkAllInstalled,
    ) -> AppResult<RequestItem> {
        actor.require_it_service()?;
        let item = self.load_item(request_id, item_id).await?;

        let rooms = self
            .repository
            .requests
            .list_room_installations(item_id)
            .await?;
        if rooms.is_empty() {
            return Err(AppError::BusinessRule(
                "Item has no rooms to install into".to_string(),
            ));
        }

        let installed_at = dto.installed_at.unwrap_or_else(Utc::now);

        let mut tx = self.repository.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE room_installations
            SET installed = TRUE, installed_at = $2,
                comment = COALESCE($3, comment), updated_at = NOW()
            WHERE request_item_id = $1
            "#,
        )
        .bind(item_id)
        .bind(installed_at)
        .bind(&dto.comment)
        .execute(&mut *tx)
        .await?;

        let item_change = sync::recompute_item_status(&mut *tx, item_id).await?;
        let request_change = sync::recompute_request_status(&mut *tx, request_id).await?;
        tx.commit().await?;

        let mut entry =
            NewHistoryEntry::new(request_id, actor.user_id, HistoryAction::Installed)
                .item(item_id, item.software_id)
                .comment(dto.comment.clone());
        if let Some((old, new)) = item_change {
            entry = entry.installation_statuses(old, new);
        }
        if let Some((old, new)) = request_change {
            entry = entry.request_statuses(old, new);
        }
        self.record(entry).await;

        self.repository.requests.get_item(item_id).await
    }

    /// Bulk status override for an item.
    ///
    /// An explicit status skips recomputation for this call: all_installed
    /// force-flips every room, problem/changed pin the item, pending and
    /// partially_installed clear the pin. Without a status the item is
    /// recomputed instead. The request recompute always follows.
    pub async fn update_item_installation(
        &self,
        actor: &UserClaims,
        request_id: Uuid,
        item_id: Uuid,
        dto: UpdateItemInstallation,
    ) -> AppResult<RequestItem> {
        actor.require_it_service()?;
        let item = self.load_item(request_id, item_id).await?;

        if dto.status == Some(InstallationStatus::Problem) && dto.comment.is_none() {
            return Err(AppError::BusinessRule(
                "Reporting a problem requires a comment".to_string(),
            ));
        }

        let now = Utc::now();
        let mut tx = self.repository.pool.begin().await?;

        let item_change = match dto.status {
            Some(status) => {
                if status == InstallationStatus::AllInstalled {
                    sqlx::query(
                        r#"
                        UPDATE room_installations
                        SET installed = TRUE,
                            installed_at = COALESCE(installed_at, $2),
                            updated_at = NOW()
                        WHERE request_item_id = $1
                        "#,
                    )
                    .bind(item_id)
                    .bind(now)
                    .execute(&mut *tx)
                    .await?;
                }

                let pin = match status {
                    InstallationStatus::Problem => Some(StatusPin::Problem),
                    InstallationStatus::Changed => Some(StatusPin::Changed),
                    _ => None,
                };
                let installed_at = if status == InstallationStatus::AllInstalled {
                    item.installed_at.or(Some(now))
                } else {
                    None
                };

                sqlx::query(
                    r#"
                    UPDATE request_items
                    SET status = $2, status_pin = $3, installed_at = $4,
                        comment = COALESCE($5, comment), status_changed_at = $6
                    WHERE id = $1
                    "#,
                )
                .bind(item_id)
                .bind(status)
                .bind(pin)
                .bind(installed_at)
                .bind(&dto.comment)
                .bind(now)
                .execute(&mut *tx)
                .await?;

                (item.status != status).then_some((item.status, status))
            }
            None => {
                if dto.comment.is_some() {
                    sqlx::query("UPDATE request_items SET comment = $2 WHERE id = $1")
                        .bind(item_id)
                        .bind(&dto.comment)
                        .execute(&mut *tx)
                        .await?;
                }
                sync::recompute_item_status(&mut *tx, item_id).await?
            }
        };

        let request_change = sync::recompute_request_status(&mut *tx, request_id).await?;
        tx.commit().await?;

        let mut entry = NewHistoryEntry::new(
            request_id,
            actor.user_id,
            HistoryAction::InstallationStatusChanged,
        )
        .item(item_id, item.software_id)
        .comment(dto.comment.clone());
        if let Some((old, new)) = item_change {
            entry = entry.installation_statuses(old, new);
        }
        if let Some((old, new)) = request_change {
            entry = entry.request_statuses(old, new);
        }
        self.record(entry).await;

        self.repository.requests.get_item(item_id).await
    }
}
