//! # jobboard
//!
//! Data-access layer for a job board backed by PostgreSQL.
//!
//! - [`sql_for_partial_update`] turns a set of changed fields into a
//!   parameterized `SET` clause.
//! - [`JobFilter`] turns listing criteria into a parameterized `WHERE` clause.
//! - [`JobRepository`] creates, lists, fetches, updates and deletes jobs over any
//!   [`GenericClient`].
//!
//! # Quick start
//!
//! ```ignore
//! use jobboard::{DbConfig, JobFilter, JobRepository, NewJob, create_pool_from_config};
//!
//! let config = DbConfig::from_env()?;
//! let pool = create_pool_from_config(&config)?;
//! jobboard::migrate::run_pool(&pool).await?;
//!
//! let jobs = JobRepository::new(pool.get().await?);
//! let job = jobs
//!     .create(&NewJob {
//!         title: "Engineer".into(),
//!         salary: Some(100_000),
//!         equity: None,
//!         company_handle: "acme".into(),
//!     })
//!     .await?;
//!
//! let paid = jobs.find_all(&JobFilter::new().min_salary(50_000)).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod job;
#[cfg(feature = "migrate")]
pub mod migrate;
pub mod monitor;
pub mod partial_update;
#[cfg(feature = "pool")]
pub mod pool;
pub mod row;
pub mod sql;
pub mod validate;

pub use client::GenericClient;
pub use config::DbConfig;
pub use error::{JobBoardError, JobBoardResult};
pub use job::{JOB_COLUMNS, Job, JobField, JobFilter, JobPatch, JobRepository, NewJob};
pub use monitor::TracingClient;
pub use partial_update::{SetClause, sql_for_partial_update};
#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_from_config};
pub use row::{FromRow, RowExt};
pub use sql::{Param, Sql, param, sql};
pub use validate::{ValidationCode, ValidationError, ValidationErrors};

// Re-export the driver types callers need to implement `GenericClient`.
pub use tokio_postgres::Row;
pub use tokio_postgres::types::ToSql;
