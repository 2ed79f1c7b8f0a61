use crate::models::session_token::SessionToken;
use crate::repositories::user_repository::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use sqlx::SqlitePool;

const TOKEN_COLUMNS: &str = "id, user_id, token, expires_at, created_at";

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait TokenRepository: Send + Sync {
    async fn insert(
        &self,
        user_id: i64,
        token: &str,
        expires_at: &str,
    ) -> RepositoryResult<SessionToken>;
    async fn find_by_token(&self, token: &str) -> RepositoryResult<Option<SessionToken>>;
    async fn delete_by_token(&self, token: &str) -> RepositoryResult<()>;
    async fn delete_for_user(&self, user_id: i64) -> RepositoryResult<u64>;
    async fn list_for_user(&self, user_id: i64) -> RepositoryResult<Vec<SessionToken>>;
}

pub struct SqliteTokenRepository {
    pool: SqlitePool,
}

impl SqliteTokenRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for SqliteTokenRepository {
    async fn insert(
        &self,
        user_id: i64,
        token: &str,
        expires_at: &str,
    ) -> RepositoryResult<SessionToken> {
        sqlx::query("INSERT INTO session_tokens (user_id, token, expires_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(token)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;

        self.find_by_token(token)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn find_by_token(&self, token: &str) -> RepositoryResult<Option<SessionToken>> {
        let row = sqlx::query_as::<_, SessionToken>(&format!(
            "SELECT {TOKEN_COLUMNS} FROM session_tokens WHERE token = ?"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete_by_token(&self, token: &str) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM session_tokens WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete_for_user(&self, user_id: i64) -> RepositoryResult<u64> {
        let result = sqlx::query("DELETE FROM session_tokens WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn list_for_user(&self, user_id: i64) -> RepositoryResult<Vec<SessionToken>> {
        let rows = sqlx::query_as::<_, SessionToken>(&format!(
            "SELECT {TOKEN_COLUMNS} FROM session_tokens WHERE user_id = ? ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
