//! Department model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Department model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create department request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDepartment {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 2, max = 50, message = "Code must be 2-50 characters"))]
    pub code: String,
    pub description: Option<String>,
}

/// Update department request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDepartment {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 2, max = 50, message = "Code must be 2-50 characters"))]
    pub code: Option<String>,
    pub description: Option<String>,
}
