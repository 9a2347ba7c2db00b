use std::{env, time::Duration};

use sqlx::postgres::PgPoolOptions;

/// Database connection pool type.
pub type DbPool = sqlx::PgPool;

/// Initialize the pool from the `DATABASE_URL` environment variable.
pub async fn init_db_from_env() -> DbPool {
    let conn_url = env::var("DATABASE_URL").expect("DATABASE_URL not set");
    new_db_pool(&conn_url).await.expect("database unreachable")
}

/// Create a pool for the given connection URL.
///
/// Pool settings:
///
/// - idle timeout 60s
/// - max lifetime 1500s
/// - max 10 connections, min 2
/// - acquire timeout 2s
/// - connections tested before acquire
pub async fn new_db_pool(conn_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .idle_timeout(Duration::from_secs(60))
        .max_lifetime(Duration::from_secs(1500))
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(2))
        .test_before_acquire(true)
        .min_connections(2)
        .connect(conn_url)
        .await
}

/// Run the statements of a SQL file, split on `;`.
#[allow(unused)]
pub async fn migrate(db: &DbPool, file: &str) -> Result<(), sqlx::Error> {
    let content = std::fs::read_to_string(file)?;

    for sql in content.split(';') {
        if sql.trim().is_empty() {
            continue;
        }
        sqlx::query(sql).execute(db).await?;
    }
    Ok(())
}
