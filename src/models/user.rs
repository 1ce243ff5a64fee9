//! User model, role specializations, and JWT claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

use super::enums::UserRole;

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub last_name: String,
    pub first_name: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub sso_id: Option<String>,
    pub role: UserRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Teacher specialization (1:1 with a user)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Teacher {
    pub id: Uuid,
    pub user_id: Uuid,
    pub employee_number: String,
    pub office: Option<String>,
}

/// IT-service member specialization (1:1 with a user)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ItServiceMember {
    pub id: Uuid,
    pub user_id: Uuid,
}

/// Administrator specialization (1:1 with a user)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Administrator {
    pub id: Uuid,
    pub user_id: Uuid,
}

/// User list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct UserQuery {
    pub role: Option<UserRole>,
    pub active: Option<bool>,
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    pub sso_id: Option<String>,
    pub role: UserRole,
}

/// Create teacher request (user plus specialization in one call)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTeacher {
    #[validate(nested)]
    #[serde(flatten)]
    pub user: CreateUser,
    #[validate(length(min = 1, max = 50, message = "Employee number must be 1-50 characters"))]
    pub employee_number: String,
    pub office: Option<String>,
}

/// Update user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    pub sso_id: Option<String>,
    pub active: Option<bool>,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: Uuid,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// IT-service members and admins manage installations and see everything
    pub fn require_it_service(&self) -> Result<(), AppError> {
        if matches!(self.role, UserRole::ItService | UserRole::Admin) {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "IT service privileges required".to_string(),
            ))
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Administrator privileges required".to_string(),
            ))
        }
    }

    /// Teachers (and admins acting on their behalf) create requests
    pub fn require_request_creation(&self) -> Result<(), AppError> {
        if self.role.can_create_request() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Only teachers may create installation requests".to_string(),
            ))
        }
    }
}
