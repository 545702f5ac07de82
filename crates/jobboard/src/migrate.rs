//! Embedded SQL migrations via [`refinery`].
//!
//! The migrations under `crates/jobboard/migrations` create the `companies` and
//! `jobs` tables, including the `jobs_title_key` unique constraint that
//! [`crate::JobRepository::create`] relies on.
//!
//! # Example
//!
//! ```ignore
//! let pool = jobboard::create_pool(&std::env::var("DATABASE_URL")?)?;
//! jobboard::migrate::run_pool(&pool).await?;
//! ```

use crate::error::JobBoardResult;

pub use refinery::Report;

mod embedded {
    refinery::embed_migrations!("./migrations");
}

/// A runner over the embedded migrations.
pub fn runner() -> refinery::Runner {
    embedded::migrations::runner()
}

/// Apply all pending embedded migrations.
pub async fn run(client: &mut tokio_postgres::Client) -> JobBoardResult<Report> {
    let report = runner().run_async(client).await?;
    for migration in report.applied_migrations() {
        tracing::info!(
            target: "jobboard.migrate",
            version = migration.version(),
            name = migration.name(),
            "applied migration"
        );
    }
    Ok(report)
}

/// Pool variant of [`run`].
#[cfg(feature = "pool")]
pub async fn run_pool(pool: &deadpool_postgres::Pool) -> JobBoardResult<Report> {
    let mut client = pool.get().await?;
    run(&mut client).await
}
