use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::auth_service::AuthServiceError;
use crate::services::user_service::UserServiceError;

// Type alias for Result with our ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// Login failed. Deliberately carries no detail about which factor
    /// was wrong.
    #[error("Unable to login")]
    InvalidCredentials,

    #[error("Please authenticate")]
    Unauthenticated,

    /// A PATCH body contained a key outside the updatable set.
    #[error("Invalid update field: {0}")]
    UnknownField(String),

    #[error("Not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::InvalidCredentials => {
                (StatusCode::BAD_REQUEST, "Unable to login".to_string())
            }
            ApiError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Please authenticate".to_string())
            }
            ApiError::UnknownField(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ApiError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::InternalError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}

impl From<UserServiceError> for ApiError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::InvalidName
            | UserServiceError::InvalidEmail
            | UserServiceError::WeakPassword
            | UserServiceError::EmailTaken => ApiError::Validation(err.to_string()),
            UserServiceError::UserNotFound => ApiError::NotFound,
            UserServiceError::HashingError(e) => {
                tracing::error!("Password hashing failed: {}", e);
                ApiError::InternalError
            }
            UserServiceError::RepositoryError(e) => {
                tracing::error!("Repository error: {}", e);
                ApiError::InternalError
            }
        }
    }
}

impl From<AuthServiceError> for ApiError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthServiceError::InvalidToken | AuthServiceError::UserNotFound => {
                ApiError::Unauthenticated
            }
            AuthServiceError::RepositoryError(e) => {
                tracing::error!("Repository error: {}", e);
                ApiError::InternalError
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_login_failure_maps_to_400() {
        let response = ApiError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_auth_maps_to_401() {
        let response = ApiError::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_unknown_update_field_maps_to_404() {
        let response = ApiError::UnknownField("namasde".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
