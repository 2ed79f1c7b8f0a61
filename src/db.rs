use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/userbase.db?mode=rwc";

pub async fn create_pool() -> Result<SqlitePool, sqlx::Error> {
    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    // Ensure the data directory exists
    if let Some(parent) = std::path::Path::new(
        database_url
            .trim_start_matches("sqlite://")
            .split('?')
            .next()
            .unwrap_or(""),
    )
    .parent()
    {
        std::fs::create_dir_all(parent).ok();
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    Ok(pool)
}
