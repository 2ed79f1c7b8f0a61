pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<services::user_service::UserService>,
    pub auth_service: Arc<services::auth_service::AuthService>,
    pub pool: sqlx::SqlitePool,
}

/// Assemble the full route table. Kept outside `main` so integration
/// tests can drive the exact router the binary serves.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/users/me",
            get(handlers::me)
                .patch(handlers::update_me)
                .delete(handlers::delete_me),
        )
        .route(
            "/users/me/avatar",
            post(handlers::upload_avatar).delete(handlers::delete_avatar),
        )
        .route("/users/logout", post(handlers::logout))
        .route("/users/logoutAll", post(handlers::logout_all))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    Router::new()
        .route("/users", post(handlers::signup))
        .route("/users/login", post(handlers::login))
        .route("/users/{id}/avatar", get(handlers::get_avatar))
        .merge(protected)
        .with_state(state)
}
