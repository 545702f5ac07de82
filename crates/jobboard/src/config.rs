//! Database configuration loaded from the environment.

use crate::error::{JobBoardError, JobBoardResult};
use std::time::Duration;

/// Connection and pool settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Maximum pool size (default: `16`).
    pub pool_max_size: usize,
    /// How long to wait for a pooled connection. `None` waits indefinitely.
    pub pool_timeout: Option<Duration>,
    /// Statements slower than this are logged at `WARN` by a client built with
    /// [`crate::TracingClient::from_config`].
    pub slow_query_threshold: Option<Duration>,
}

impl DbConfig {
    pub const DEFAULT_POOL_MAX_SIZE: usize = 16;

    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            pool_max_size: Self::DEFAULT_POOL_MAX_SIZE,
            pool_timeout: None,
            slow_query_threshold: None,
        }
    }

    /// Load configuration from environment variables, reading a `.env` file first
    /// if one exists.
    ///
    /// | Env Var                      | Default    |
    /// |------------------------------|------------|
    /// | `DATABASE_URL`               | (required) |
    /// | `DATABASE_POOL_MAX_SIZE`     | `16`       |
    /// | `DATABASE_POOL_TIMEOUT_SECS` | unset      |
    /// | `DATABASE_SLOW_QUERY_MS`     | unset      |
    pub fn from_env() -> JobBoardResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (used by [`DbConfig::from_env`]).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> JobBoardResult<Self> {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| JobBoardError::Config("DATABASE_URL is not set".to_string()))?;

        let pool_max_size = match lookup("DATABASE_POOL_MAX_SIZE") {
            Some(v) => parse_var("DATABASE_POOL_MAX_SIZE", &v)?,
            None => Self::DEFAULT_POOL_MAX_SIZE,
        };
        if pool_max_size == 0 {
            return Err(JobBoardError::Config(
                "DATABASE_POOL_MAX_SIZE must be at least 1".to_string(),
            ));
        }

        let pool_timeout = lookup("DATABASE_POOL_TIMEOUT_SECS")
            .map(|v| parse_var("DATABASE_POOL_TIMEOUT_SECS", &v).map(Duration::from_secs))
            .transpose()?;

        let slow_query_threshold = lookup("DATABASE_SLOW_QUERY_MS")
            .map(|v| parse_var("DATABASE_SLOW_QUERY_MS", &v).map(Duration::from_millis))
            .transpose()?;

        Ok(Self {
            database_url,
            pool_max_size,
            pool_timeout,
            slow_query_threshold,
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> JobBoardResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| JobBoardError::Config(format!("{key} has an invalid value: {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let cfg = DbConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/jobly")]))
            .unwrap();
        assert_eq!(cfg, DbConfig::new("postgres://localhost/jobly"));
    }

    #[test]
    fn all_values() {
        let cfg = DbConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/jobly"),
            ("DATABASE_POOL_MAX_SIZE", "4"),
            ("DATABASE_POOL_TIMEOUT_SECS", "5"),
            ("DATABASE_SLOW_QUERY_MS", " 250 "),
        ]))
        .unwrap();
        assert_eq!(cfg.pool_max_size, 4);
        assert_eq!(cfg.pool_timeout, Some(Duration::from_secs(5)));
        assert_eq!(cfg.slow_query_threshold, Some(Duration::from_millis(250)));
    }

    #[test]
    fn missing_url_is_an_error() {
        let err = DbConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, JobBoardError::Config(_)));
        let err = DbConfig::from_lookup(lookup(&[("DATABASE_URL", "  ")])).unwrap_err();
        assert!(matches!(err, JobBoardError::Config(_)));
    }

    #[test]
    fn invalid_numbers_are_errors() {
        let err = DbConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/jobly"),
            ("DATABASE_POOL_MAX_SIZE", "lots"),
        ]))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"Config error: DATABASE_POOL_MAX_SIZE has an invalid value: "lots""#
        );

        let err = DbConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/jobly"),
            ("DATABASE_POOL_MAX_SIZE", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, JobBoardError::Config(_)));
    }
}
