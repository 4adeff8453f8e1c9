pub mod favorites;
pub mod models;
pub mod pantry;
pub mod recipes;
pub mod shopping_list;

use crate::config::DatabaseConfig;
use crate::error::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite, SqlitePool};
use std::path::Path;
use std::time::Duration;

pub type DbPool = Pool<Sqlite>;

/// Create the parent directory of a file-backed SQLite database
async fn ensure_sqlite_dir(database_url: &str) -> Result<()> {
    if let Some(path) = database_url.strip_prefix("sqlite:") {
        let path = path.trim_start_matches("//");
        if path.starts_with(":memory:") {
            return Ok(());
        }
        let path = path.split('?').next().unwrap_or(path);
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
    }
    Ok(())
}

/// Ensure the connection string creates the SQLite file when missing
fn with_create_mode(database_url: &str) -> String {
    if database_url.starts_with("sqlite:")
        && !database_url.contains(":memory:")
        && !database_url.contains("mode=")
    {
        let sep = if database_url.contains('?') { '&' } else { '?' };
        format!("{database_url}{sep}mode=rwc")
    } else {
        database_url.to_string()
    }
}

/// Initialize database connection pool
pub async fn init_pool(database_url: &str) -> Result<DbPool> {
    ensure_sqlite_dir(database_url).await?;

    let pool = SqlitePool::connect(&with_create_mode(database_url)).await?;
    Ok(pool)
}

/// Initialize database connection pool with custom configuration
pub async fn init_pool_with_config(config: &DatabaseConfig) -> Result<DbPool> {
    ensure_sqlite_dir(&config.url).await?;

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
        .connect(&with_create_mode(&config.url))
        .await?;

    Ok(pool)
}

/// Run database migrations
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// In-memory database with the schema applied, shared by unit tests
#[cfg(test)]
pub(crate) async fn test_pool() -> DbPool {
    // A single connection keeps every query on the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}
