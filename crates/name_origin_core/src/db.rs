//! Database connection management
//!
//! Opens the SQLite pool and applies the cache schema. Every request takes its
//! own connection from the pool; there is no ambient global session.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{info, warn};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS names (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        name             VARCHAR(100) NOT NULL UNIQUE,
        request_count    INTEGER NOT NULL DEFAULT 1,
        last_accessed_at TEXT NOT NULL,
        last_refreshed_at TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS countries (
        id                 INTEGER PRIMARY KEY AUTOINCREMENT,
        country_code       VARCHAR(2) NOT NULL UNIQUE,
        country_code3      VARCHAR(3),
        country_name       VARCHAR(100) NOT NULL,
        official_name      VARCHAR(150),
        region             VARCHAR(50),
        subregion          VARCHAR(50),
        independent        BOOLEAN,
        google_maps_link   VARCHAR(255),
        openstreetmap_link VARCHAR(255),
        capital_name       VARCHAR(100),
        capital_latitude   REAL,
        capital_longitude  REAL,
        flag_png           VARCHAR(255),
        flag_svg           VARCHAR(255),
        flag_alt           VARCHAR(255),
        coat_of_arms_png   VARCHAR(255),
        coat_of_arms_svg   VARCHAR(255),
        borders            TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS name_origins (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name_id     INTEGER NOT NULL REFERENCES names(id),
        country_id  INTEGER NOT NULL REFERENCES countries(id),
        probability REAL NOT NULL,
        observed_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ix_name_origins_name_id ON name_origins(name_id)",
    "CREATE INDEX IF NOT EXISTS ix_name_origins_country_id ON name_origins(country_id)",
];

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub connection_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://./database.db".to_string(),
            max_connections: 5,
            connection_timeout: Duration::from_secs(30),
        }
    }
}

/// Open the pool, creating the database file if needed, and apply the schema.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    info!("Connecting to database: {}", config.database_url);

    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connection_timeout)
        .connect_with(options)
        .await
        .map_err(|e| {
            warn!("Failed to connect to database: {}", e);
            e
        })?;

    apply_schema(&pool).await?;
    info!("Database connection pool created successfully");
    Ok(pool)
}

/// Single-connection in-memory pool. Each SQLite memory connection is its own
/// database, so the pool must never open a second one or recycle the first.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    apply_schema(&pool).await?;
    Ok(pool)
}

pub async fn apply_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Test database connectivity
pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").fetch_one(pool).await.map(|_| ())
}
