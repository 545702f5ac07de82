//! `SET` clause generation for partial updates.
//!
//! Given `(field, value)` pairs and a field → column translation table, this
//! produces `"col_a"=$1, "col_b"=$2` plus the values in the same order.
//!
//! ```ignore
//! use jobboard::partial_update::sql_for_partial_update;
//! use jobboard::sql::param;
//!
//! let clause = sql_for_partial_update(
//!     vec![("firstName", param("Aliya")), ("age", param(32))],
//!     &[("firstName", "first_name")],
//! )?;
//! assert_eq!(clause.set_cols, r#""first_name"=$1, "age"=$2"#);
//! ```
//!
//! Values are always bound. Column names are written into the SQL text (quoted),
//! so field names must come from a fixed set such as [`crate::job::JobField`],
//! never straight from user input.

use crate::error::{JobBoardError, JobBoardResult};
use crate::sql::Param;
use std::fmt;
use tokio_postgres::types::ToSql;

/// Rendered `SET` list and its positional values.
#[derive(Clone)]
pub struct SetClause {
    /// `"column"=$n` fragments joined by `", "`; `$n` starts at 1.
    pub set_cols: String,
    /// Bound values, ordered like the fragments.
    pub values: Vec<Param>,
    columns: Vec<String>,
}

impl SetClause {
    /// Storage column names, in `SET` order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values as `tokio-postgres` parameter refs.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values
            .iter()
            .map(|v| v.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }
}

impl fmt::Debug for SetClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetClause")
            .field("set_cols", &self.set_cols)
            .field("values", &self.values)
            .finish()
    }
}

/// Build the `SET` list for a partial update.
///
/// `js_to_sql` maps field names to storage column names; fields without an entry
/// use their own name.
///
/// # Errors
///
/// [`JobBoardError::Validation`] (`"No data"`) when `data` is empty.
pub fn sql_for_partial_update<K>(
    data: Vec<(K, Param)>,
    js_to_sql: &[(&str, &str)],
) -> JobBoardResult<SetClause>
where
    K: AsRef<str>,
{
    if data.is_empty() {
        return Err(JobBoardError::validation("No data"));
    }

    let mut set_cols = String::new();
    let mut columns = Vec::with_capacity(data.len());
    let mut values = Vec::with_capacity(data.len());

    for (idx, (field, value)) in data.into_iter().enumerate() {
        let field = field.as_ref();
        let column = js_to_sql
            .iter()
            .find(|(from, _)| *from == field)
            .map_or(field, |(_, to)| *to);

        if idx > 0 {
            set_cols.push_str(", ");
        }
        set_cols.push_str(&quote_ident(column));
        set_cols.push_str("=$");
        set_cols.push_str(&(idx + 1).to_string());

        columns.push(column.to_string());
        values.push(value);
    }

    Ok(SetClause {
        set_cols,
        values,
        columns,
    })
}

/// Double-quote an identifier, doubling any embedded `"`.
pub(crate) fn quote_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for ch in name.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
    out
}
