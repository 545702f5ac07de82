//! `tracing` instrumentation for SQL execution.
//!
//! [`TracingClient`] wraps any [`GenericClient`] and emits one event per statement
//! on the `jobboard.sql` target, plus a `WARN` event for statements slower than the
//! configured threshold.
//!
//! ```ignore
//! use jobboard::{JobRepository, TracingClient};
//! use std::time::Duration;
//!
//! let client = TracingClient::new(pool.get().await?)
//!     .slow_query_threshold(Duration::from_millis(250));
//! let jobs = JobRepository::new(client);
//!
//! // or take the threshold from `DATABASE_SLOW_QUERY_MS`
//! let config = jobboard::DbConfig::from_env()?;
//! let jobs = JobRepository::new(TracingClient::from_config(pool.get().await?, &config));
//! ```

use crate::client::GenericClient;
use crate::config::DbConfig;
use crate::error::JobBoardResult;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;
use tracing::Level;

/// Truncate a SQL string to at most `max_bytes` bytes without splitting a char.
fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// A client wrapper that logs every statement through `tracing`.
#[derive(Debug, Clone)]
pub struct TracingClient<C> {
    client: C,
    /// Tracing event level for per-statement events.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
    /// Statements slower than this are reported at `WARN`.
    pub slow_query_threshold: Option<Duration>,
}

impl<C: GenericClient> TracingClient<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            level: Level::DEBUG,
            max_sql_length: Some(200),
            slow_query_threshold: None,
        }
    }

    /// Wrap `client` using the slow-query threshold from `config`.
    pub fn from_config(client: C, config: &DbConfig) -> Self {
        Self {
            slow_query_threshold: config.slow_query_threshold,
            ..Self::new(client)
        }
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub fn slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }

    fn display_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    fn emit(&self, tag: &str, sql: &str, param_count: usize, elapsed: Duration, ok: bool) {
        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let sql = self.display_sql(sql);
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;

        emit_at_level!(
            self.level,
            target: "jobboard.sql",
            tag,
            param_count,
            elapsed_ms,
            ok,
            sql = %sql,
        );

        if self.slow_query_threshold.is_some_and(|t| elapsed > t) {
            tracing::warn!(target: "jobboard.sql", tag, elapsed_ms, sql = %sql, "slow query");
        }
    }

    async fn timed<T, F>(&self, tag: &str, sql: &str, param_count: usize, fut: F) -> JobBoardResult<T>
    where
        F: Future<Output = JobBoardResult<T>>,
    {
        let start = Instant::now();
        let result = fut.await;
        self.emit(tag, sql, param_count, start.elapsed(), result.is_ok());
        result
    }
}

impl<C: GenericClient> GenericClient for TracingClient<C> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JobBoardResult<Vec<Row>> {
        self.query_tagged("-", sql, params).await
    }

    async fn query_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> JobBoardResult<Vec<Row>> {
        self.timed(tag, sql, params.len(), self.client.query_tagged(tag, sql, params))
            .await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JobBoardResult<u64> {
        self.execute_tagged("-", sql, params).await
    }

    async fn execute_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> JobBoardResult<u64> {
        self.timed(tag, sql, params.len(), self.client.execute_tagged(tag, sql, params))
            .await
    }
}
