use crate::auth::middleware::CurrentUser;
use crate::error::{ApiError, Result};
use crate::models::user::UserProfile;
use crate::services::auth_service::LoginRequest;
use crate::services::user_service::{CreateUserRequest, UpdateProfileRequest};
use crate::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;

const MAX_AVATAR_BYTES: usize = 1_000_000;

/// The keys a PATCH /users/me body may contain. Anything else rejects
/// the whole request before any field is applied.
const UPDATABLE_FIELDS: [&str; 3] = ["name", "email", "password"];

#[derive(Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(serde::Serialize)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub token: String,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let user = state
        .user_service
        .create_user(CreateUserRequest {
            name: payload.name,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    let session = state.auth_service.issue_token(user.id).await?;

    tracing::info!(user_id = user.id, "user signed up");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserProfile::from(user),
            token: session.token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>> {
    let user = state
        .auth_service
        .authenticate(LoginRequest {
            email: payload.email,
            password: payload.password,
        })
        .await?;

    let session = state.auth_service.issue_token(user.id).await?;

    Ok(Json(AuthResponse {
        user: UserProfile::from(user),
        token: session.token,
    }))
}

/// Revoke the token this request authenticated with; other sessions of
/// the same user stay valid.
pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<StatusCode> {
    state.auth_service.revoke_token(&current.token).await?;
    Ok(StatusCode::OK)
}

pub async fn logout_all(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<StatusCode> {
    state.auth_service.revoke_all_tokens(current.user.id).await?;
    Ok(StatusCode::OK)
}

pub async fn me(Extension(current): Extension<CurrentUser>) -> Json<UserProfile> {
    Json(UserProfile::from(&current.user))
}

pub async fn update_me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(body): Json<serde_json::Map<String, Value>>,
) -> Result<Json<UserProfile>> {
    for key in body.keys() {
        if !UPDATABLE_FIELDS.contains(&key.as_str()) {
            return Err(ApiError::UnknownField(key.clone()));
        }
    }

    let field = |key: &str| -> Result<Option<String>> {
        match body.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(ApiError::Validation(format!("{key} must be a string"))),
        }
    };

    let updated = state
        .user_service
        .update_profile(
            current.user.id,
            UpdateProfileRequest {
                name: field("name")?,
                email: field("email")?,
                password: field("password")?,
            },
        )
        .await?;

    Ok(Json(UserProfile::from(updated)))
}

pub async fn delete_me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<UserProfile>> {
    let profile = UserProfile::from(&current.user);
    state.user_service.delete_user(current.user.id).await?;

    tracing::info!(user_id = current.user.id, "account deleted");

    Ok(Json(profile))
}

fn avatar_mime(content_type: Option<&str>, file_name: Option<&str>) -> Option<&'static str> {
    match content_type {
        Some("image/jpeg") => return Some("image/jpeg"),
        Some("image/png") => return Some("image/png"),
        _ => {}
    }

    let name = file_name?.to_lowercase();
    if name.ends_with(".jpg") || name.ends_with(".jpeg") {
        Some("image/jpeg")
    } else if name.ends_with(".png") {
        Some("image/png")
    } else {
        None
    }
}

pub async fn upload_avatar(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<StatusCode> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?
    {
        if field.name() != Some("avatar") {
            continue;
        }

        let mime = avatar_mime(field.content_type(), field.file_name())
            .ok_or_else(|| ApiError::Validation("Please upload a jpeg or png image".to_string()))?;

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        if data.len() > MAX_AVATAR_BYTES {
            return Err(ApiError::Validation(
                "Avatar must be 1MB or smaller".to_string(),
            ));
        }

        state
            .user_service
            .set_avatar(current.user.id, &data, mime)
            .await?;

        return Ok(StatusCode::OK);
    }

    Err(ApiError::Validation(
        "Missing avatar field in upload".to_string(),
    ))
}

pub async fn delete_avatar(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<StatusCode> {
    state.user_service.clear_avatar(current.user.id).await?;
    Ok(StatusCode::OK)
}

pub async fn get_avatar(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Response> {
    let (data, mime) = state
        .user_service
        .get_avatar(id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(([(header::CONTENT_TYPE, mime)], data).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_mime_from_content_type() {
        assert_eq!(avatar_mime(Some("image/jpeg"), None), Some("image/jpeg"));
        assert_eq!(avatar_mime(Some("image/png"), None), Some("image/png"));
    }

    #[test]
    fn test_avatar_mime_from_filename() {
        assert_eq!(
            avatar_mime(None, Some("profile-pic.JPG")),
            Some("image/jpeg")
        );
        assert_eq!(avatar_mime(None, Some("pic.png")), Some("image/png"));
    }

    #[test]
    fn test_avatar_mime_rejects_other_types() {
        assert_eq!(avatar_mime(Some("application/pdf"), Some("doc.pdf")), None);
        assert_eq!(avatar_mime(None, None), None);
    }
}
