pub mod test_helpers {
    use crate::repositories::{SqliteTokenRepository, SqliteUserRepository};
    use crate::services::{auth_service::AuthService, user_service::UserService};
    use crate::AppState;
    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    /// Create a new in-memory SQLite database for testing
    pub async fn create_test_db() -> Result<SqlitePool, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(pool)
    }

    /// Create a temporary file-based SQLite database for testing
    /// Useful when you need to test features that don't work with in-memory databases
    pub async fn create_test_db_file() -> Result<(SqlitePool, NamedTempFile), sqlx::Error> {
        let temp_file = NamedTempFile::new().map_err(sqlx::Error::Io)?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| sqlx::Error::Configuration("Invalid database path".into()))?;
        let database_url = format!("sqlite://{}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&database_url)
            .await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok((pool, temp_file))
    }

    /// Build the application state and router over the given pool, wired
    /// exactly the way `main` does it.
    pub fn build_app(pool: SqlitePool) -> (AppState, axum::Router) {
        let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
        let token_repository = Arc::new(SqliteTokenRepository::new(pool.clone()));

        let user_service = Arc::new(UserService::new(user_repository.clone()));
        let auth_service = Arc::new(AuthService::new(user_repository, token_repository));

        let state = AppState {
            user_service,
            auth_service,
            pool,
        };

        let router = crate::router(state.clone());
        (state, router)
    }

    /// Insert a test user with hashed password
    pub async fn insert_test_user(
        pool: &SqlitePool,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<i64, sqlx::Error> {
        use argon2::{
            password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
            Argon2,
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                sqlx::Error::Configuration(format!("Password hashing failed: {}", e).into())
            })?
            .to_string();

        let result = sqlx::query("INSERT INTO users (name, email, password_hash) VALUES (?, ?, ?)")
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .execute(pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// Issue a bearer token for a test user, bypassing the login flow
    pub async fn issue_test_token(pool: &SqlitePool, user_id: i64) -> Result<String, sqlx::Error> {
        use rand::Rng;

        let mut rng = rand::thread_rng();
        let bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
        let token = hex::encode(bytes);
        let expires_at = (chrono::Utc::now() + chrono::Duration::days(1)).to_rfc3339();

        sqlx::query("INSERT INTO session_tokens (user_id, token, expires_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(&token)
            .bind(expires_at)
            .execute(pool)
            .await?;

        Ok(token)
    }
}
