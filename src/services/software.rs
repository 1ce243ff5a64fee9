//! Software catalog service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        software::{CreateSoftware, Software, SoftwareQuery, UpdateSoftware},
        version::SoftwareVersion,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct SoftwareService {
    repository: Repository,
}

impl SoftwareService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &SoftwareQuery) -> AppResult<Vec<Software>> {
        self.repository.software.list(query).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Software> {
        self.repository.software.get_by_id(id).await
    }

    pub async fn create(&self, dto: CreateSoftware) -> AppResult<Software> {
        SoftwareVersion::from_string(&dto.version)?;
        if self
            .repository
            .software
            .name_version_taken(&dto.name, &dto.version, None)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Software '{}' version {} already exists",
                dto.name, dto.version
            )));
        }
        self.repository.software.create(&dto).await
    }

    pub async fn update(&self, id: Uuid, dto: UpdateSoftware) -> AppResult<Software> {
        let existing = self.repository.software.get_by_id(id).await?;
        if let Some(version) = &dto.version {
            SoftwareVersion::from_string(version)?;
        }
        let name = dto.name.as_deref().unwrap_or(&existing.name);
        let version = dto.version.as_deref().unwrap_or(&existing.version);
        if self
            .repository
            .software
            .name_version_taken(name, version, Some(id))
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Software '{}' version {} already exists",
                name, version
            )));
        }
        self.repository.software.update(id, &dto).await
    }

    /// Soft delete: the entry stays referenced by past requests
    pub async fn deactivate(&self, id: Uuid) -> AppResult<()> {
        self.repository.software.deactivate(id).await
    }
}
