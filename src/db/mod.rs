//! Database connection management

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use std::str::FromStr;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::error::BenchError;

/// PostgreSQL database connection pool
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect using a configuration section (`url` takes precedence)
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let options = connect_options(config)?;
        let host = options.get_host().to_string();
        let dbname = options.get_database().unwrap_or_default().to_string();
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_with(options)
            .await?;

        tracing::info!(
            host = %host,
            dbname = %dbname,
            max_connections = config.max_connections,
            "PostgreSQL connection pool established"
        );
        Ok(Self { pool })
    }

    /// Connect and run a health check. Any failure is a setup error.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, BenchError> {
        let db = Self::connect(config).await?;
        db.health_check().await?;
        Ok(db)
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, sqlx::Error> {
    let mut options = match &config.url {
        Some(url) => PgConnectOptions::from_str(url)?,
        None => PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.dbname)
            .ssl_mode(PgSslMode::from_str(&config.sslmode)?),
    };

    if let Some(tz) = &config.timezone {
        options = options.options([("TimeZone", tz.as_str())]);
    }
    Ok(options)
}
