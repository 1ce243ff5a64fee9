//! Room management service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::RoomType,
        room::{CreateRoom, Room, RoomDetails, UpdateRoom},
        software::Software,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct RoomsService {
    repository: Repository,
}

impl RoomsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, department_id: Option<Uuid>) -> AppResult<Vec<Room>> {
        self.repository.rooms.list(department_id).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<RoomDetails> {
        let room = self.repository.rooms.get_by_id(id).await?;
        let software = self.repository.rooms.installed_software(id).await?;
        Ok(RoomDetails { room, software })
    }

    pub async fn create(&self, dto: CreateRoom) -> AppResult<Room> {
        self.check_type_department(dto.room_type, dto.department_id)
            .await?;
        if let Some(software_ids) = &dto.software_ids {
            self.check_software_exists(software_ids).await?;
        }
        self.repository.rooms.create(&dto).await
    }

    pub async fn update(&self, id: Uuid, mut dto: UpdateRoom) -> AppResult<Room> {
        let existing = self.repository.rooms.get_by_id(id).await?;
        let room_type = dto.room_type.unwrap_or(existing.room_type);
        // Omitting department_id keeps the current one
        if dto.department_id.is_none() && room_type == RoomType::Departmental {
            dto.department_id = existing.department_id;
        }
        self.check_type_department(room_type, dto.department_id)
            .await?;
        if let Some(software_ids) = &dto.software_ids {
            self.check_software_exists(software_ids).await?;
        }
        self.repository.rooms.update(id, &dto).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.rooms.delete(id).await
    }

    /// Software currently installed in the room (catalog, outside any request)
    pub async fn installed_software(&self, id: Uuid) -> AppResult<Vec<Software>> {
        self.repository.rooms.get_by_id(id).await?;
        self.repository.rooms.installed_software(id).await
    }

    /// Departmental rooms require a department; shared rooms forbid one
    async fn check_type_department(
        &self,
        room_type: RoomType,
        department_id: Option<Uuid>,
    ) -> AppResult<()> {
        match (room_type, department_id) {
            (RoomType::Departmental, None) => Err(AppError::BusinessRule(
                "A departmental room must belong to a department".to_string(),
            )),
            (RoomType::Shared, Some(_)) => Err(AppError::BusinessRule(
                "A shared room cannot belong to a department".to_string(),
            )),
            (RoomType::Departmental, Some(id)) => {
                self.repository.departments.get_by_id(id).await?;
                Ok(())
            }
            (RoomType::Shared, None) => Ok(()),
        }
    }

    async fn check_software_exists(&self, software_ids: &[Uuid]) -> AppResult<()> {
        for id in software_ids {
            self.repository.software.get_by_id(*id).await?;
        }
        Ok(())
    }
}
