use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, Statement,
};

use crate::config::Config;

const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Connects and syncs the schema, retrying forever on a fixed backoff.
pub async fn connect_with_retry(config: &Config) -> DatabaseConnection {
    loop {
        match connect(config).await {
            Ok(db) => {
                tracing::info!("database connected and synchronized");
                return db;
            }
            Err(err) => {
                tracing::error!(error = %err, "database connection failed, retrying in 5s");
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
    }
}

pub async fn connect(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new(config.database_url.clone());
    opts.max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout_secs))
        .sqlx_logging(false);

    let db = Database::connect(opts).await?;

    if db.get_database_backend() == DbBackend::Sqlite {
        for pragma in ["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL"] {
            db.execute(Statement::from_string(DbBackend::Sqlite, pragma.to_string())).await?;
        }
    }

    Migrator::up(&db, None).await?;
    Ok(db)
}
