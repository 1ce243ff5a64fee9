//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        enums::UserRole,
        user::{CreateTeacher, CreateUser, Teacher, UpdateUser, User, UserClaims, UserQuery},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by email and password, returning a JWT token
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !user.active {
            return Err(AppError::Authentication("Account is deactivated".to_string()));
        }

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication("Invalid email or password".to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        tracing::info!(user = %user.full_name(), role = %user.role, "user authenticated");
        Ok((token, user))
    }

    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.email.clone(),
            user_id: user.id,
            role: user.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify user password
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        if let Some(ref hash) = user.password {
            let parsed_hash = PasswordHash::new(hash)
                .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
            return Ok(Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok());
        }
        Ok(false)
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn list(&self, query: &UserQuery) -> AppResult<Vec<User>> {
        self.repository.users.list(query).await
    }

    /// Create a user without specialization
    pub async fn create(&self, dto: CreateUser) -> AppResult<User> {
        if self.repository.users.email_taken(&dto.email, None).await? {
            return Err(AppError::Conflict(format!(
                "A user with email {} already exists",
                dto.email
            )));
        }
        let password_hash = match &dto.password {
            Some(password) => Some(self.hash_password(password)?),
            None => None,
        };
        self.repository.users.create(&dto, password_hash).await
    }

    /// Create a teacher account: user row plus specialization
    pub async fn create_teacher(&self, dto: CreateTeacher) -> AppResult<(User, Teacher)> {
        if dto.user.role != UserRole::Teacher {
            return Err(AppError::BusinessRule(
                "A teacher account must carry the teacher role".to_string(),
            ));
        }
        if self
            .repository
            .users
            .email_taken(&dto.user.email, None)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "A user with email {} already exists",
                dto.user.email
            )));
        }
        if self
            .repository
            .users
            .employee_number_taken(&dto.employee_number)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "A teacher with employee number {} already exists",
                dto.employee_number
            )));
        }
        let password_hash = match &dto.user.password {
            Some(password) => Some(self.hash_password(password)?),
            None => None,
        };
        self.repository
            .users
            .create_teacher(
                &dto.user,
                password_hash,
                &dto.employee_number,
                dto.office.as_deref(),
            )
            .await
    }

    /// Attach the IT-service specialization to an existing user
    pub async fn create_it_service_member(&self, user_id: Uuid) -> AppResult<()> {
        let user = self.repository.users.get_by_id(user_id).await?;
        if user.role != UserRole::ItService {
            return Err(AppError::BusinessRule(
                "An IT-service member must carry the it_service role".to_string(),
            ));
        }
        if self.repository.users.has_specialization(user_id).await? {
            return Err(AppError::BusinessRule(
                "User already carries a specialization".to_string(),
            ));
        }
        self.repository.users.create_it_service_member(user_id).await
    }

    /// Attach the administrator specialization to an existing user
    pub async fn create_administrator(&self, user_id: Uuid) -> AppResult<()> {
        let user = self.repository.users.get_by_id(user_id).await?;
        if user.role != UserRole::Admin {
            return Err(AppError::BusinessRule(
                "An administrator must carry the admin role".to_string(),
            ));
        }
        if self.repository.users.has_specialization(user_id).await? {
            return Err(AppError::BusinessRule(
                "User already carries a specialization".to_string(),
            ));
        }
        self.repository.users.create_administrator(user_id).await
    }

    pub async fn update(&self, id: Uuid, dto: UpdateUser) -> AppResult<User> {
        self.repository.users.get_by_id(id).await?;
        if let Some(email) = &dto.email {
            if self.repository.users.email_taken(email, Some(id)).await? {
                return Err(AppError::Conflict(format!(
                    "A user with email {} already exists",
                    email
                )));
            }
        }
        let password_hash = match &dto.password {
            Some(password) => Some(self.hash_password(password)?),
            None => None,
        };
        self.repository.users.update(id, &dto, password_hash).await
    }

    pub async fn deactivate(&self, id: Uuid) -> AppResult<()> {
        self.repository.users.deactivate(id).await
    }

    /// Resolve the teacher specialization of a user, if any
    pub async fn teacher_for_user(&self, user_id: Uuid) -> AppResult<Option<Teacher>> {
        self.repository.users.get_teacher_by_user(user_id).await
    }
}
