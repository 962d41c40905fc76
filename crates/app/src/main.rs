use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

/// How often expired calculations are swept from the store.
const PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "nightshare={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let Some(server) = settings.server else {
        tracing::warn!("no server settings found, nothing to run");
        return Ok(());
    };

    tracing::info!("Found server settings...");
    let db = parse_database(&server.database).await?;
    let ttl = chrono::TimeDelta::try_days(settings.storage.ttl_days)
        .ok_or("storage.ttl_days is out of range")?;
    let engine = engine::Engine::builder()
        .database(db)
        .ttl(ttl)
        .build()
        .await?;

    let sweeper = engine.clone();
    tasks.spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            match sweeper.purge_expired().await {
                Ok(0) => {}
                Ok(purged) => tracing::info!("purged {purged} expired calculations"),
                Err(err) => tracing::error!("failed to purge expired calculations: {err}"),
            }
        }
    });

    let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, server.port);
    tasks.spawn(async move {
        server::run(engine, &addr).await;
    });

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
