use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One issued bearer token. Rows are ordered by `id`, so the most recent
/// login for a user is the row with the greatest `id`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SessionToken {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub expires_at: String,
    pub created_at: Option<String>,
}
