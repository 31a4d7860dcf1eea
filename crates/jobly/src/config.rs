//! Database configuration loaded from the environment.
//!
//! Variables (a `.env` file in the working directory is read first):
//!
//! - `DATABASE_URL`: connection string, default `postgres:///jobly`
//! - `JOBLY_ENV`: when `test`, `TEST_DATABASE_URL` is used instead
//!   (default `postgres:///jobly_test`)
//! - `DATABASE_POOL_SIZE`: maximum pooled connections, default 16

use crate::error::{JoblyError, JoblyResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub pool_size: usize,
}

impl DatabaseConfig {
    pub const DEFAULT_URL: &'static str = "postgres:///jobly";
    pub const DEFAULT_TEST_URL: &'static str = "postgres:///jobly_test";
    pub const DEFAULT_POOL_SIZE: usize = 16;

    /// Load from the process environment (after reading `.env`, if present).
    pub fn from_env() -> JoblyResult<Self> {
        if let Err(e) = dotenvy::dotenv()
            && !e.not_found()
        {
            return Err(JoblyError::Config(format!(".env: {e}")));
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> JoblyResult<Self> {
        let is_test = lookup("JOBLY_ENV").is_some_and(|env| env == "test");

        let database_url = if is_test {
            lookup("TEST_DATABASE_URL").unwrap_or_else(|| Self::DEFAULT_TEST_URL.to_string())
        } else {
            lookup("DATABASE_URL").unwrap_or_else(|| Self::DEFAULT_URL.to_string())
        };

        let pool_size = match lookup("DATABASE_POOL_SIZE") {
            None => Self::DEFAULT_POOL_SIZE,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(JoblyError::Config(format!(
                        "DATABASE_POOL_SIZE must be a positive integer, got {raw:?}"
                    )));
                }
            },
        };

        tracing::debug!(target: "jobly.config", is_test, pool_size, "loaded database config");

        Ok(Self {
            database_url,
            pool_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = DatabaseConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.database_url, "postgres:///jobly");
        assert_eq!(config.pool_size, 16);
    }

    #[test]
    fn test_env_uses_test_database() {
        let config = DatabaseConfig::from_lookup(lookup_from(&[
            ("JOBLY_ENV", "test"),
            ("DATABASE_URL", "postgres:///prod"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "postgres:///jobly_test");

        let config = DatabaseConfig::from_lookup(lookup_from(&[
            ("JOBLY_ENV", "test"),
            ("TEST_DATABASE_URL", "postgres://ci/jobly"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "postgres://ci/jobly");
    }

    #[test]
    fn explicit_url_and_pool_size() {
        let config = DatabaseConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/jobly"),
            ("DATABASE_POOL_SIZE", "4"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "postgres://db/jobly");
        assert_eq!(config.pool_size, 4);
    }

    #[test]
    fn rejects_bad_pool_size() {
        for raw in ["0", "-1", "many"] {
            let err =
                DatabaseConfig::from_lookup(lookup_from(&[("DATABASE_POOL_SIZE", raw)])).unwrap_err();
            assert!(matches!(err, JoblyError::Config(_)));
        }
    }
}
