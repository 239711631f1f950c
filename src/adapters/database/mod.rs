pub mod records;
pub mod user_repo;

use crate::config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::time::Duration;

pub type DbPool = Pool<Sqlite>;

const USERS_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    email TEXT UNIQUE,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
)
";

/// Opens the database file, creating it if absent, and ensures the `users` table exists.
///
/// Safe to call repeatedly against the same file; existing rows are left untouched.
///
/// # Errors
/// Returns `sqlx::Error` if the file cannot be opened or the schema statement fails.
pub async fn init_store(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(&config.path)
        .create_if_missing(true)
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms));

    let pool = SqlitePoolOptions::new().max_connections(config.max_connections.max(1)).connect_with(options).await?;

    sqlx::query(USERS_SCHEMA).execute(&pool).await?;

    Ok(pool)
}
