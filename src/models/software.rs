//! Software catalog model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Software catalog entry from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Software {
    pub id: Uuid,
    pub name: String,
    pub publisher: String,
    /// Version stored as "major.minor.patch"
    pub version: String,
    pub usage: Option<String>,
    pub description: Option<String>,
    /// Maximum installation duration in days (at most one year)
    pub max_duration_days: i32,
    pub license: Option<String>,
    pub logo_url: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Software list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct SoftwareQuery {
    /// Substring match on the name
    pub search: Option<String>,
    pub active: Option<bool>,
}

/// Create software request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSoftware {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Publisher is required"))]
    pub publisher: String,
    /// Semantic version, "major.minor.patch"
    pub version: String,
    pub usage: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1, max = 365, message = "Max duration must be 1-365 days"))]
    pub max_duration_days: Option<i32>,
    pub license: Option<String>,
    #[validate(url(message = "Invalid logo URL"))]
    pub logo_url: Option<String>,
}

/// Update software request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSoftware {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub publisher: Option<String>,
    pub version: Option<String>,
    pub usage: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1, max = 365, message = "Max duration must be 1-365 days"))]
    pub max_duration_days: Option<i32>,
    pub license: Option<String>,
    #[validate(url(message = "Invalid logo URL"))]
    pub logo_url: Option<String>,
    pub active: Option<bool>,
}
