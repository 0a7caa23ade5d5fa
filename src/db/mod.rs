use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::config::Config;
use crate::error::{AppError, AppResult};

pub async fn connect(config: &Config) -> AppResult<DatabaseConnection> {
    let mut opts = ConnectOptions::new(&config.database_url);
    // Store calls must fail within a bounded window rather than hang.
    opts.connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(config.request_timeout_secs));

    Database::connect(opts)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to connect to database: {}", e)))
}
