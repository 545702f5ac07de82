//! Job records: types, listing filter and repository.

pub mod filter;
pub mod repo;

pub use filter::JobFilter;
pub use repo::JobRepository;

use crate::error::JobBoardResult;
use crate::row::{FromRow, RowExt};
use crate::sql::{Param, param};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use tokio_postgres::Row;

/// Public fields of a stored job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> JobBoardResult<Self> {
        Ok(Self {
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("companyHandle")?,
        })
    }
}

/// Create payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// Partial update payload.
///
/// `None` leaves a column untouched. For nullable columns `Some(None)` sets the
/// column to NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub salary: Option<Option<i32>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub equity: Option<Option<Decimal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_handle: Option<String>,
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent key (`None`).
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

impl JobPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.salary.is_none()
            && self.equity.is_none()
            && self.company_handle.is_none()
    }

    /// Present fields as `(field, value)` pairs in a fixed order:
    /// title, salary, equity, companyHandle.
    pub fn into_changes(self) -> Vec<(JobField, Param)> {
        let mut changes = Vec::new();
        if let Some(title) = self.title {
            changes.push((JobField::Title, param(title)));
        }
        if let Some(salary) = self.salary {
            changes.push((JobField::Salary, param(salary)));
        }
        if let Some(equity) = self.equity {
            changes.push((JobField::Equity, param(equity)));
        }
        if let Some(handle) = self.company_handle {
            changes.push((JobField::CompanyHandle, param(handle)));
        }
        changes
    }
}

/// The closed set of job fields a partial update may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobField {
    Title,
    Salary,
    Equity,
    CompanyHandle,
}

impl JobField {
    pub const ALL: [JobField; 4] = [
        JobField::Title,
        JobField::Salary,
        JobField::Equity,
        JobField::CompanyHandle,
    ];

    /// External (camelCase) field name.
    pub fn name(self) -> &'static str {
        match self {
            JobField::Title => "title",
            JobField::Salary => "salary",
            JobField::Equity => "equity",
            JobField::CompanyHandle => "companyHandle",
        }
    }
}

impl AsRef<str> for JobField {
    fn as_ref(&self) -> &str {
        self.name()
    }
}

/// Field names whose storage column differs.
pub const JOB_COLUMNS: &[(&str, &str)] = &[("companyHandle", "company_handle")];
