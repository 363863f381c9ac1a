use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::env;
use std::time::Duration;

/// Pool sizing for a single-instance deployment; municipal traffic never
/// needs a large pool, so the defaults stay small.
const DEFAULT_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;

fn pool_size(raw: Option<String>, default: u32) -> u32 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

pub async fn get_database() -> Result<DatabaseConnection, DbErr> {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(pool_size(
        env::var("DB_MAX_CONNECTIONS").ok(),
        DEFAULT_MAX_CONNECTIONS,
    ))
    .min_connections(pool_size(
        env::var("DB_MIN_CONNECTIONS").ok(),
        DEFAULT_MIN_CONNECTIONS,
    ))
    .connect_timeout(Duration::from_secs(8))
    .acquire_timeout(Duration::from_secs(8))
    .idle_timeout(Duration::from_secs(600))
    .max_lifetime(Duration::from_secs(1800))
    .sqlx_logging(true);

    Database::connect(opt).await
}
