#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use configs::DatabaseConfig;
use models::db::connect_with_config;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Connection for DB-backed tests, or `None` when no Postgres is configured.
pub async fn get_db() -> Result<Option<DatabaseConnection>, anyhow::Error> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(None);
    }
    let mut cfg = DatabaseConfig::from_env();
    if cfg.url.trim().is_empty() || cfg.is_memory() {
        return Ok(None);
    }

    // Run migrations exactly once, with a throwaway connection
    let migrate_cfg = cfg.clone();
    MIGRATED
        .get_or_try_init(|| async move {
            let db = connect_with_config(&migrate_cfg).await?;
            migration::Migrator::up(&db, None).await?;
            drop(db);
            Ok::<(), anyhow::Error>(())
        })
        .await?;

    // Return a fresh connection for the current test's runtime
    cfg.max_connections = cfg.max_connections.max(5);
    cfg.acquire_timeout_secs = 10;
    let db = connect_with_config(&cfg).await?;
    Ok(Some(db))
}
