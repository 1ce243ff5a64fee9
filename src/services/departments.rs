//! Department management service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::department::{CreateDepartment, Department, UpdateDepartment},
    repository::Repository,
};

#[derive(Clone)]
pub struct DepartmentsService {
    repository: Repository,
}

impl DepartmentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Department>> {
        self.repository.departments.list().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Department> {
        self.repository.departments.get_by_id(id).await
    }

    pub async fn create(&self, dto: CreateDepartment) -> AppResult<Department> {
        if self
            .repository
            .departments
            .name_or_code_taken(&dto.name, &dto.code, None)
            .await?
        {
            return Err(AppError::Conflict(
                "A department with this name or code already exists".to_string(),
            ));
        }
        self.repository.departments.create(&dto).await
    }

    pub async fn update(&self, id: Uuid, dto: UpdateDepartment) -> AppResult<Department> {
        let existing = self.repository.departments.get_by_id(id).await?;
        let name = dto.name.as_deref().unwrap_or(&existing.name);
        let code = dto.code.as_deref().unwrap_or(&existing.code);
        if self
            .repository
            .departments
            .name_or_code_taken(name, code, Some(id))
            .await?
        {
            return Err(AppError::Conflict(
                "A department with this name or code already exists".to_string(),
            ));
        }
        self.repository.departments.update(id, &dto).await
    }

    /// Delete a department; refused while it still owns rooms
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let rooms = self.repository.departments.count_rooms(id).await?;
        if rooms > 0 {
            return Err(AppError::BusinessRule(format!(
                "Cannot delete department: {} room(s) still attached",
                rooms
            )));
        }
        self.repository.departments.delete(id).await
    }
}
