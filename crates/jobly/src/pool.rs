//! Connection pool utilities

use crate::config::DatabaseConfig;
use crate::error::{JoblyError, JoblyResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;

/// Create a connection pool from a database URL.
///
/// Uses `NoTls` and a maximum of 16 connections.
///
/// # Example
///
/// ```ignore
/// let pool = jobly::create_pool("postgres:///jobly")?;
/// let client = pool.get().await?;
/// ```
pub fn create_pool(database_url: &str) -> JoblyResult<Pool> {
    create_pool_with_size(database_url, DatabaseConfig::DEFAULT_POOL_SIZE)
}

/// Create a connection pool from loaded configuration.
pub fn create_pool_from_config(config: &DatabaseConfig) -> JoblyResult<Pool> {
    create_pool_with_size(&config.database_url, config.pool_size)
}

/// Create a connection pool with a custom maximum size.
pub fn create_pool_with_size(database_url: &str, max_size: usize) -> JoblyResult<Pool> {
    let pg_config: tokio_postgres::Config = database_url
        .parse()
        .map_err(|e: tokio_postgres::Error| JoblyError::Connection(e.to_string()))?;

    let manager_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };
    let mgr = Manager::from_config(pg_config, NoTls, manager_config);
    let pool = Pool::builder(mgr)
        .max_size(max_size)
        .build()
        .map_err(|e| JoblyError::Pool(e.to_string()))?;

    tracing::debug!(target: "jobly.pool", max_size, "created connection pool");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_url() {
        let err = create_pool("postgres://user@host:notaport/db").unwrap_err();
        assert!(matches!(err, JoblyError::Connection(_)));
    }

    // Building the pool does not open connections.
    #[test]
    fn builds_without_connecting() {
        let pool = create_pool_with_size("postgres://localhost/jobly_test", 4).unwrap();
        assert_eq!(pool.status().max_size, 4);
    }
}
