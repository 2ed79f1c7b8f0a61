use crate::{error::ApiError, models::user::User, AppState};
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

/// The authenticated caller, injected into request extensions by
/// [`require_auth`]. Carries the presented token so logout can revoke
/// exactly the session that made the request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get("authorization")
        .ok_or(ApiError::Unauthenticated)?
        .to_str()
        .map_err(|_| ApiError::Unauthenticated)?;

    if !auth_header.starts_with("Bearer ") {
        return Err(ApiError::Unauthenticated);
    }

    Ok(auth_header["Bearer ".len()..].to_string())
}

/// Resolve the bearer token to a user and stash it in request extensions.
/// Any failure, from a missing header to a revoked or expired token,
/// collapses into a single 401.
pub async fn require_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)?;

    let user = state
        .auth_service
        .resolve_token(&token)
        .await
        .map_err(|_| ApiError::Unauthenticated)?;

    request.extensions_mut().insert(CurrentUser { user, token });

    Ok(next.run(request).await)
}
