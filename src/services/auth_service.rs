use crate::models::session_token::SessionToken;
use crate::models::user::User;
use crate::repositories::token_repository::TokenRepository;
use crate::repositories::user_repository::{RepositoryError, UserRepository};
use argon2::{password_hash::PasswordHash, Argon2, PasswordVerifier};
use chrono::{Duration, Utc};
use rand::Rng;
use std::sync::Arc;

const DEFAULT_TOKEN_TTL_DAYS: i64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Token not found or expired")]
    InvalidToken,
    #[error("User not found")]
    UserNotFound,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    token_repository: Arc<dyn TokenRepository>,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        token_repository: Arc<dyn TokenRepository>,
    ) -> Self {
        Self {
            user_repository,
            token_repository,
            token_ttl: Duration::days(DEFAULT_TOKEN_TTL_DAYS),
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    fn generate_token() -> String {
        let mut rng = rand::thread_rng();
        let bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
        hex::encode(bytes)
    }

    pub async fn authenticate(&self, request: LoginRequest) -> Result<User, AuthServiceError> {
        let email = request.email.trim().to_lowercase();

        let user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !self.verify_password(&request.password, &user.password_hash) {
            return Err(AuthServiceError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Mint a fresh bearer token for the user. Every call appends a new
    /// entry to the user's token list; earlier tokens stay valid.
    pub async fn issue_token(&self, user_id: i64) -> Result<SessionToken, AuthServiceError> {
        let token = Self::generate_token();
        let expires_at = (Utc::now() + self.token_ttl).to_rfc3339();

        Ok(self
            .token_repository
            .insert(user_id, &token, &expires_at)
            .await?)
    }

    /// Resolve a presented bearer token to its user. Expired tokens are
    /// removed on sight and treated the same as unknown ones.
    pub async fn resolve_token(&self, token: &str) -> Result<User, AuthServiceError> {
        let session = self
            .token_repository
            .find_by_token(token)
            .await?
            .ok_or(AuthServiceError::InvalidToken)?;

        let expires_at = chrono::DateTime::parse_from_rfc3339(&session.expires_at)
            .map_err(|_| AuthServiceError::InvalidToken)?;

        if expires_at < Utc::now() {
            self.token_repository.delete_by_token(token).await?;
            return Err(AuthServiceError::InvalidToken);
        }

        self.user_repository
            .find_by_id(session.user_id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)
    }

    pub async fn revoke_token(&self, token: &str) -> Result<(), AuthServiceError> {
        match self.token_repository.delete_by_token(token).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(AuthServiceError::InvalidToken),
            Err(e) => Err(AuthServiceError::RepositoryError(e)),
        }
    }

    pub async fn revoke_all_tokens(&self, user_id: i64) -> Result<u64, AuthServiceError> {
        Ok(self.token_repository.delete_for_user(user_id).await?)
    }

    fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        if let Ok(parsed_hash) = PasswordHash::new(password_hash) {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
        } else {
            false
        }
    }
}
