//! Dynamic `WHERE` clause for job listings.

use crate::sql::Sql;
use serde::{Deserialize, Serialize};

/// Optional predicates narrowing a job listing. All absent means all jobs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobFilter {
    /// Case-insensitive substring of the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_like: Option<String>,
    /// Inclusive lower bound on salary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_salary: Option<i32>,
    /// `Some(true)` keeps only jobs with `equity > 0`. `Some(false)` and `None`
    /// do not constrain equity at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_equity: Option<bool>,
}

impl JobFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title_like(mut self, needle: impl Into<String>) -> Self {
        self.title_like = Some(needle.into());
        self
    }

    pub fn min_salary(mut self, min: i32) -> Self {
        self.min_salary = Some(min);
        self
    }

    pub fn has_equity(mut self, has_equity: bool) -> Self {
        self.has_equity = Some(has_equity);
        self
    }

    /// Build ` WHERE ...` for the present predicates, or an empty fragment.
    ///
    /// Predicates are emitted in the order title, salary, equity and joined
    /// with `AND`. Only `title_like` and `min_salary` bind parameters.
    pub fn where_clause(&self) -> Sql {
        let mut predicates: Vec<Sql> = Vec::with_capacity(3);

        if let Some(needle) = &self.title_like {
            let mut p = Sql::new("LOWER(title) LIKE LOWER(");
            p.push_bind(format!("%{needle}%")).push(")");
            predicates.push(p);
        }
        if let Some(min) = self.min_salary {
            let mut p = Sql::new("salary >= ");
            p.push_bind(min);
            predicates.push(p);
        }
        if self.has_equity == Some(true) {
            predicates.push(Sql::new("equity > 0"));
        }

        let mut out = Sql::empty();
        for (i, p) in predicates.into_iter().enumerate() {
            out.push(if i == 0 { " WHERE " } else { " AND " });
            out.push_sql(p);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_predicates_is_empty() {
        let w = JobFilter::new().where_clause();
        assert!(w.is_empty());
        assert_eq!(w.to_sql(), "");
        assert_eq!(w.params_len(), 0);
    }

    #[test]
    fn title_like_wraps_value_in_wildcards() {
        let w = JobFilter::new().title_like("j3").where_clause();
        assert_eq!(w.to_sql(), " WHERE LOWER(title) LIKE LOWER($1)");
        assert_eq!(format!("{:?}", w.params()), r#"["%j3%"]"#);
    }

    #[test]
    fn title_like_is_bound_not_interpolated() {
        let w = JobFilter::new().title_like("x'; DROP TABLE jobs; --").where_clause();
        assert!(!w.to_sql().contains("DROP"));
        assert_eq!(w.params_len(), 1);
    }

    #[test]
    fn min_salary_only() {
        let w = JobFilter::new().min_salary(2).where_clause();
        assert_eq!(w.to_sql(), " WHERE salary >= $1");
        assert_eq!(w.params_len(), 1);
    }

    #[test]
    fn has_equity_true_adds_literal_predicate() {
        let w = JobFilter::new().has_equity(true).where_clause();
        assert_eq!(w.to_sql(), " WHERE equity > 0");
        assert_eq!(w.params_len(), 0);
    }

    #[test]
    fn has_equity_false_adds_nothing() {
        let w = JobFilter::new().has_equity(false).where_clause();
        assert!(w.is_empty());

        let w = JobFilter::new().min_salary(3).has_equity(false).where_clause();
        assert_eq!(w.to_sql(), " WHERE salary >= $1");
        assert!(!w.to_sql().contains("equity"));
    }

    #[test]
    fn all_predicates_in_fixed_order() {
        let w = JobFilter::new()
            .has_equity(true)
            .min_salary(3)
            .title_like("3")
            .where_clause();
        assert_eq!(
            w.to_sql(),
            " WHERE LOWER(title) LIKE LOWER($1) AND salary >= $2 AND equity > 0"
        );
        assert_eq!(format!("{:?}", w.params()), r#"["%3%", 3]"#);
    }

    #[test]
    fn param_count_matches_bound_predicates() {
        let cases = [
            (JobFilter::new(), 0),
            (JobFilter::new().title_like("a"), 1),
            (JobFilter::new().min_salary(1), 1),
            (JobFilter::new().has_equity(true), 0),
            (JobFilter::new().title_like("a").min_salary(1), 2),
            (JobFilter::new().title_like("a").has_equity(true), 1),
        ];
        for (filter, expected) in cases {
            assert_eq!(filter.where_clause().params_len(), expected, "{filter:?}");
        }
    }

    #[test]
    fn deserializes_query_shape() {
        let f: JobFilter =
            serde_json::from_str(r#"{"titleLike":"eng","minSalary":2,"hasEquity":false}"#)
                .unwrap();
        assert_eq!(f, JobFilter::new().title_like("eng").min_salary(2).has_equity(false));

        let f: JobFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(f, JobFilter::default());
    }
}
