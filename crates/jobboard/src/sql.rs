//! Parameter-safe SQL fragments.
//!
//! `Sql` stores SQL text and bound values separately and generates `$1, $2, ...`
//! placeholders when rendered, so fragments built independently (a `SET` list,
//! a `WHERE` clause) can be composed without manually tracking indices.
//!
//! # Example
//!
//! ```ignore
//! use jobboard::sql;
//!
//! let mut q = sql("SELECT title FROM jobs WHERE 1=1");
//! if let Some(min) = min_salary {
//!     q.push(" AND salary >= ").push_bind(min);
//! }
//! q.push(" ORDER BY title");
//!
//! let rows = q.fetch_all_tagged(&client, "jobs.find_all").await?;
//! ```

use crate::client::GenericClient;
use crate::error::{JobBoardError, JobBoardResult};
use std::fmt;
use std::sync::Arc;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A bound parameter value.
pub type Param = Arc<dyn ToSql + Sync + Send>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum SqlPart {
    Raw(String),
    Param,
}

/// Type-erase a value so it can sit next to values of other types.
pub fn param<T>(value: T) -> Param
where
    T: ToSql + Sync + Send + 'static,
{
    Arc::new(value)
}

/// Start building a SQL statement.
pub fn sql(initial_sql: impl Into<String>) -> Sql {
    Sql::new(initial_sql)
}

/// A parameter-safe dynamic SQL builder.
#[must_use]
#[derive(Clone, Default)]
pub struct Sql {
    parts: Vec<SqlPart>,
    params: Vec<Param>,
}

impl Sql {
    /// Create a new builder with an initial SQL fragment.
    pub fn new(initial_sql: impl Into<String>) -> Self {
        Self {
            parts: vec![SqlPart::Raw(initial_sql.into())],
            params: Vec::new(),
        }
    }

    /// Create an empty builder.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append raw SQL (no parameters).
    pub fn push(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }

        match self.parts.last_mut() {
            Some(SqlPart::Raw(last)) => last.push_str(sql),
            _ => self.parts.push(SqlPart::Raw(sql.to_string())),
        }
        self
    }

    /// Append a parameter placeholder and bind its value.
    pub fn push_bind<T>(&mut self, value: T) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.push_bind_value(Arc::new(value))
    }

    /// Append a parameter placeholder for an already type-erased value.
    pub fn push_bind_value(&mut self, value: Param) -> &mut Self {
        self.parts.push(SqlPart::Param);
        self.params.push(value);
        self
    }

    /// Append another `Sql` fragment, consuming it.
    ///
    /// Placeholders of `other` are renumbered to follow the ones already present.
    pub fn push_sql(&mut self, other: Sql) -> &mut Self {
        for part in other.parts {
            match part {
                SqlPart::Raw(s) => {
                    self.push(&s);
                }
                SqlPart::Param => self.parts.push(SqlPart::Param),
            }
        }
        self.params.extend(other.params);
        self
    }

    /// `true` when nothing (not even whitespace) has been pushed.
    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(|p| match p {
            SqlPart::Raw(s) => s.is_empty(),
            SqlPart::Param => false,
        })
    }

    /// Number of bound parameters.
    pub fn params_len(&self) -> usize {
        self.params.len()
    }

    /// Bound values, in placeholder order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Render SQL with `$1, $2, ...` placeholders.
    pub fn to_sql(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        let mut idx: usize = 0;
        for part in &self.parts {
            match part {
                SqlPart::Raw(s) => out.push_str(s),
                SqlPart::Param => {
                    idx += 1;
                    let _ = write!(&mut out, "${}", idx);
                }
            }
        }
        out
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }

    fn validate(&self) -> JobBoardResult<()> {
        let placeholder_count = self
            .parts
            .iter()
            .filter(|p| matches!(p, SqlPart::Param))
            .count();

        if placeholder_count != self.params.len() {
            let params_len = self.params.len();
            return Err(JobBoardError::Validation(format!(
                "Sql: placeholders({placeholder_count}) != params({params_len})"
            )));
        }
        Ok(())
    }

    /// Execute and return all rows, associating a tag.
    pub async fn fetch_all_tagged(
        &self,
        conn: &impl GenericClient,
        tag: &str,
    ) -> JobBoardResult<Vec<Row>> {
        self.validate()?;
        let sql = self.to_sql();
        conn.query_tagged(tag, &sql, &self.params_ref()).await
    }

    /// Execute and return the first row if any, associating a tag.
    pub async fn fetch_opt_tagged(
        &self,
        conn: &impl GenericClient,
        tag: &str,
    ) -> JobBoardResult<Option<Row>> {
        self.validate()?;
        let sql = self.to_sql();
        conn.query_opt_tagged(tag, &sql, &self.params_ref()).await
    }
}

impl fmt::Debug for Sql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sql")
            .field("sql", &self.to_sql())
            .field("params", &self.params)
            .finish()
    }
}
