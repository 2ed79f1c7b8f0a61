use crate::models::user::User;
use crate::repositories::user_repository::{RepositoryError, UserRepository};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString},
    Argon2, PasswordVerifier,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid")
});

const MIN_PASSWORD_LEN: usize = 7;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("Name must not be empty")]
    InvalidName,
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Password too weak (minimum {MIN_PASSWORD_LEN} characters, must not contain \"password\")")]
    WeakPassword,
    #[error("User not found")]
    UserNotFound,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Password hashing failed: {0}")]
    HashingError(String),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Fields a PATCH may set. Absent fields are left untouched.
#[derive(Default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, UserServiceError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(UserServiceError::InvalidName);
        }

        let email = Self::normalize_email(&request.email);
        self.validate_email(&email)?;
        self.validate_password(&request.password)?;

        let password_hash = self.hash_password(&request.password)?;

        match self
            .repository
            .create_user(name, &email, &password_hash)
            .await
        {
            Ok(user) => Ok(user),
            Err(RepositoryError::AlreadyExists) => Err(UserServiceError::EmailTaken),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        Ok(self
            .repository
            .find_by_email(&Self::normalize_email(email))
            .await?)
    }

    pub async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Validate every requested field before touching the store, so a bad
    /// value in one field never leaves a half-applied update behind.
    pub async fn update_profile(
        &self,
        user_id: i64,
        request: UpdateProfileRequest,
    ) -> Result<User, UserServiceError> {
        let name = match request.name {
            Some(raw) => {
                let trimmed = raw.trim().to_string();
                if trimmed.is_empty() {
                    return Err(UserServiceError::InvalidName);
                }
                Some(trimmed)
            }
            None => None,
        };

        let email = match request.email {
            Some(raw) => {
                let normalized = Self::normalize_email(&raw);
                self.validate_email(&normalized)?;
                if let Some(existing) = self.repository.find_by_email(&normalized).await? {
                    if existing.id != user_id {
                        return Err(UserServiceError::EmailTaken);
                    }
                }
                Some(normalized)
            }
            None => None,
        };

        let password_hash = match request.password {
            Some(raw) => {
                self.validate_password(&raw)?;
                Some(self.hash_password(&raw)?)
            }
            None => None,
        };

        if let Some(name) = name {
            self.apply(self.repository.update_name(user_id, &name).await)?;
        }
        if let Some(email) = email {
            self.apply(self.repository.update_email(user_id, &email).await)?;
        }
        if let Some(hash) = password_hash {
            self.apply(self.repository.update_password(user_id, &hash).await)?;
        }

        self.repository
            .find_by_id(user_id)
            .await?
            .ok_or(UserServiceError::UserNotFound)
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), UserServiceError> {
        match self.repository.delete_user(id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn set_avatar(
        &self,
        id: i64,
        data: &[u8],
        mime: &str,
    ) -> Result<(), UserServiceError> {
        self.apply(self.repository.set_avatar(id, data, mime).await)
    }

    pub async fn clear_avatar(&self, id: i64) -> Result<(), UserServiceError> {
        self.apply(self.repository.clear_avatar(id).await)
    }

    pub async fn get_avatar(
        &self,
        id: i64,
    ) -> Result<Option<(Vec<u8>, String)>, UserServiceError> {
        Ok(self.repository.get_avatar(id).await?)
    }

    fn apply(&self, result: Result<(), RepositoryError>) -> Result<(), UserServiceError> {
        match result {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(RepositoryError::AlreadyExists) => Err(UserServiceError::EmailTaken),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    fn validate_email(&self, email: &str) -> Result<(), UserServiceError> {
        if email.is_empty() || email.len() > 255 || !EMAIL_RE.is_match(email) {
            return Err(UserServiceError::InvalidEmail);
        }
        Ok(())
    }

    fn validate_password(&self, password: &str) -> Result<(), UserServiceError> {
        if password.len() < MIN_PASSWORD_LEN || password.to_lowercase().contains("password") {
            return Err(UserServiceError::WeakPassword);
        }
        Ok(())
    }

    fn hash_password(&self, password: &str) -> Result<String, UserServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserServiceError::HashingError(e.to_string()))
    }

    pub fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        if let Ok(parsed_hash) = PasswordHash::new(password_hash) {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
        } else {
            false
        }
    }
}
