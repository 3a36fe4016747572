use sqlx::MySqlPool;
use tracing::info;

const CREATE_JOBS: &str = include_str!("../migrations/20260101000000_create_jobs.sql");

pub async fn init_db(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPool::connect(database_url).await?;
    ensure_schema(&pool).await?;
    Ok(pool)
}

/// Creates the `jobs` table when it does not exist yet.
async fn ensure_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_JOBS).execute(pool).await?;
    info!("Database schema ready");
    Ok(())
}
