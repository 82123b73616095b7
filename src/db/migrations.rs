use sqlx::{Pool, Postgres};
use tracing::info;

/// Apply the embedded schema migrations (`companies`, `jobs`)
///
/// sqlx records applied migrations, so calling this repeatedly is safe.
pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations...");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await?;

    info!("Database migrations completed successfully");
    Ok(())
}
