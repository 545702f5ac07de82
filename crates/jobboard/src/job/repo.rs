//! Job repository.

use super::{JOB_COLUMNS, Job, JobFilter, JobPatch, NewJob};
use crate::client::GenericClient;
use crate::error::{JobBoardError, JobBoardResult};
use crate::partial_update::sql_for_partial_update;
use crate::row::FromRow;
use crate::sql::sql;
use tokio_postgres::types::ToSql;

/// Columns returned to callers; `id` is never part of the public payload.
const RETURNING: &str = r#"title, salary, equity, company_handle AS "companyHandle""#;

/// Create, list, fetch, update and delete rows of the `jobs` table.
///
/// The client is passed in explicitly, so the same repository code runs on a
/// plain connection, a pooled connection or inside a transaction.
#[derive(Debug, Clone)]
pub struct JobRepository<C> {
    client: C,
}

impl<C: GenericClient> JobRepository<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Insert a job and return its public fields.
    ///
    /// Uniqueness of `title` is enforced by the table's unique constraint in the
    /// same statement, so concurrent creates cannot both succeed.
    ///
    /// # Errors
    ///
    /// [`JobBoardError::Conflict`] if a job with this title already exists. Other
    /// statements report a title collision as [`JobBoardError::UniqueViolation`].
    pub async fn create(&self, job: &NewJob) -> JobBoardResult<Job> {
        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (title) DO NOTHING \
             RETURNING {RETURNING}"
        );
        let duplicate = || JobBoardError::conflict(format!("Duplicate job: {}", job.title));

        let row = self
            .client
            .query_opt_tagged(
                "jobs.create",
                &sql,
                &[&job.title, &job.salary, &job.equity, &job.company_handle],
            )
            .await
            .map_err(|e| if e.is_unique_violation() { duplicate() } else { e })?;

        let Some(row) = row else {
            tracing::debug!(target: "jobboard.jobs", title = %job.title, "duplicate job title");
            return Err(duplicate());
        };

        let created = Job::from_row(&row)?;
        tracing::debug!(target: "jobboard.jobs", title = %created.title, "job created");
        Ok(created)
    }

    /// List jobs matching `filter`, ordered by title.
    pub async fn find_all(&self, filter: &JobFilter) -> JobBoardResult<Vec<Job>> {
        let mut q = sql(format!("SELECT {RETURNING} FROM jobs"));
        q.push_sql(filter.where_clause());
        q.push(" ORDER BY title");

        let rows = q.fetch_all_tagged(&self.client, "jobs.find_all").await?;
        rows.iter().map(Job::from_row).collect()
    }

    /// Fetch one job by primary key.
    ///
    /// # Errors
    ///
    /// [`JobBoardError::NotFound`] if no job has this id.
    pub async fn get(&self, id: i32) -> JobBoardResult<Job> {
        let mut q = sql(format!("SELECT {RETURNING} FROM jobs WHERE id = "));
        q.push_bind(id);

        let row = q
            .fetch_opt_tagged(&self.client, "jobs.get")
            .await?
            .ok_or_else(|| JobBoardError::not_found(format!("No job: {id}")))?;
        Job::from_row(&row)
    }

    /// Apply a partial update and return the updated job.
    ///
    /// # Errors
    ///
    /// - [`JobBoardError::Validation`] if `patch` has no fields; nothing is sent
    ///   to the database in that case.
    /// - [`JobBoardError::NotFound`] if no job has this id.
    pub async fn update(&self, id: i32, patch: JobPatch) -> JobBoardResult<Job> {
        let set = sql_for_partial_update(patch.into_changes(), JOB_COLUMNS)?;
        let id_idx = set.values.len() + 1;

        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${id_idx} RETURNING {RETURNING}",
            set.set_cols
        );
        let mut params = set.params_ref();
        params.push(&id as &(dyn ToSql + Sync));

        let row = self
            .client
            .query_opt_tagged("jobs.update", &sql, &params)
            .await?
            .ok_or_else(|| JobBoardError::not_found(format!("No job: {id}")))?;

        tracing::debug!(target: "jobboard.jobs", id, columns = ?set.columns(), "job updated");
        Job::from_row(&row)
    }

    /// Delete a job by primary key.
    ///
    /// # Errors
    ///
    /// [`JobBoardError::NotFound`] if no job has this id.
    pub async fn remove(&self, id: i32) -> JobBoardResult<()> {
        let mut q = sql("DELETE FROM jobs WHERE id = ");
        q.push_bind(id).push(" RETURNING id");

        q.fetch_opt_tagged(&self.client, "jobs.remove")
            .await?
            .ok_or_else(|| JobBoardError::not_found(format!("No job: {id}")))?;

        tracing::debug!(target: "jobboard.jobs", id, "job removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio_postgres::Row;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Call {
        tag: String,
        sql: String,
        param_count: usize,
    }

    /// Records every statement and answers with zero rows, or with a unique
    /// violation when `unique_violation` is set.
    #[derive(Default)]
    struct RecordingClient {
        calls: Mutex<Vec<Call>>,
        unique_violation: bool,
    }

    impl RecordingClient {
        fn record(&self, tag: &str, sql: &str, params: &[&(dyn ToSql + Sync)]) {
            self.calls.lock().unwrap().push(Call {
                tag: tag.to_string(),
                sql: sql.to_string(),
                param_count: params.len(),
            });
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl GenericClient for RecordingClient {
        async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JobBoardResult<Vec<Row>> {
            self.record("-", sql, params);
            Ok(Vec::new())
        }

        async fn query_tagged(
            &self,
            tag: &str,
            sql: &str,
            params: &[&(dyn ToSql + Sync)],
        ) -> JobBoardResult<Vec<Row>> {
            self.record(tag, sql, params);
            if self.unique_violation {
                return Err(JobBoardError::UniqueViolation(
                    "jobs_title_key: duplicate key value violates unique constraint".into(),
                ));
            }
            Ok(Vec::new())
        }

        async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JobBoardResult<u64> {
            self.record("-", sql, params);
            Ok(0)
        }
    }

    fn new_job() -> NewJob {
        NewJob {
            title: "new".into(),
            salary: Some(4),
            equity: Some("0.1".parse().unwrap()),
            company_handle: "c1".into(),
        }
    }

    #[tokio::test]
    async fn update_with_empty_patch_sends_nothing() {
        let client = RecordingClient::default();
        let repo = JobRepository::new(&client);

        let err = repo.update(1, JobPatch::default()).await.unwrap_err();

        assert!(err.is_validation());
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn update_missing_row_is_not_found() {
        let client = RecordingClient::default();
        let repo = JobRepository::new(&client);
        let patch = JobPatch {
            title: Some("x".into()),
            ..Default::default()
        };

        let err = repo.update(0, patch).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not found: No job: 0");
        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].tag, "jobs.update");
        assert_eq!(
            calls[0].sql,
            r#"UPDATE jobs SET "title"=$1 WHERE id = $2 RETURNING title, salary, equity, company_handle AS "companyHandle""#
        );
        assert_eq!(calls[0].param_count, 2);
    }

    #[tokio::test]
    async fn update_translates_company_handle() {
        let client = RecordingClient::default();
        let repo = JobRepository::new(&client);
        let patch = JobPatch {
            title: Some("newJ1".into()),
            salary: Some(None),
            equity: Some(None),
            company_handle: Some("c2".into()),
        };

        let err = repo.update(7, patch).await.unwrap_err();
        assert!(err.is_not_found());

        let calls = client.calls();
        assert!(calls[0].sql.starts_with(
            r#"UPDATE jobs SET "title"=$1, "salary"=$2, "equity"=$3, "company_handle"=$4 WHERE id = $5"#
        ));
        assert_eq!(calls[0].param_count, 5);
    }

    #[tokio::test]
    async fn create_without_returned_row_is_conflict() {
        let client = RecordingClient::default();
        let repo = JobRepository::new(&client);

        let err = repo.create(&new_job()).await.unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(err.to_string(), "Conflict: Duplicate job: new");
        let calls = client.calls();
        assert_eq!(calls.len(), 1, "create must be a single statement");
        assert_eq!(calls[0].tag, "jobs.create");
        assert!(calls[0].sql.contains("ON CONFLICT (title) DO NOTHING"));
        assert_eq!(calls[0].param_count, 4);
    }

    #[tokio::test]
    async fn find_all_appends_where_and_order() {
        let client = RecordingClient::default();
        let repo = JobRepository::new(&client);

        let jobs = repo
            .find_all(&JobFilter::new().min_salary(2).has_equity(true))
            .await
            .unwrap();

        assert!(jobs.is_empty());
        let calls = client.calls();
        assert_eq!(calls[0].tag, "jobs.find_all");
        assert!(
            calls[0]
                .sql
                .ends_with(" FROM jobs WHERE salary >= $1 AND equity > 0 ORDER BY title")
        );
        assert_eq!(calls[0].param_count, 1);
    }

    #[tokio::test]
    async fn find_all_without_filter_has_no_where() {
        let client = RecordingClient::default();
        let repo = JobRepository::new(&client);

        repo.find_all(&JobFilter::default()).await.unwrap();

        let calls = client.calls();
        assert!(calls[0].sql.ends_with(" FROM jobs ORDER BY title"));
        assert_eq!(calls[0].param_count, 0);
    }

    #[tokio::test]
    async fn get_and_remove_missing_rows_are_not_found() {
        let client = RecordingClient::default();
        let repo = JobRepository::new(&client);

        assert!(repo.get(0).await.unwrap_err().is_not_found());
        assert!(repo.remove(0).await.unwrap_err().is_not_found());

        let calls = client.calls();
        let tags: Vec<&str> = calls.iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(tags, ["jobs.get", "jobs.remove"]);
        assert!(calls[0].sql.ends_with(" FROM jobs WHERE id = $1"));
        assert_eq!(calls[1].sql, "DELETE FROM jobs WHERE id = $1 RETURNING id");
        assert!(calls.iter().all(|c| c.param_count == 1));
    }

    #[tokio::test]
    async fn create_maps_unique_violation_to_conflict() {
        let client = RecordingClient {
            unique_violation: true,
            ..Default::default()
        };
        let repo = JobRepository::new(&client);

        let err = repo.create(&new_job()).await.unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(err.to_string(), "Conflict: Duplicate job: new");
    }

    #[tokio::test]
    async fn update_keeps_unique_violation_as_storage_error() {
        let client = RecordingClient {
            unique_violation: true,
            ..Default::default()
        };
        let repo = JobRepository::new(&client);
        let patch = JobPatch {
            title: Some("J1".into()),
            ..Default::default()
        };

        let err = repo.update(2, patch).await.unwrap_err();

        assert!(err.is_unique_violation(), "{err}");
        assert!(err.is_storage());
        assert!(!err.is_conflict());
    }
}
