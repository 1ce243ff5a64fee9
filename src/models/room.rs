//! Room model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::enums::RoomType;
use super::software::Software;

/// Room model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub capacity: Option<i32>,
    pub room_type: RoomType,
    pub location: Option<String>,
    pub description: Option<String>,
    pub department_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Room with its currently installed software catalog
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoomDetails {
    #[serde(flatten)]
    pub room: Room,
    pub software: Vec<Software>,
}

/// Short room representation for installation summaries
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RoomShort {
    pub id: Uuid,
    pub name: String,
}

/// Create room request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoom {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub capacity: Option<i32>,
    pub room_type: RoomType,
    pub location: Option<String>,
    pub description: Option<String>,
    pub department_id: Option<Uuid>,
    /// Software currently installed in the room (catalog, outside any request)
    pub software_ids: Option<Vec<Uuid>>,
}

/// Update room request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoom {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub capacity: Option<i32>,
    pub room_type: Option<RoomType>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub department_id: Option<Uuid>,
    pub software_ids: Option<Vec<Uuid>>,
}
