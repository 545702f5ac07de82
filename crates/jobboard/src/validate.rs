//! Changeset-style input validation for job payloads.
//!
//! The repository assumes typed, well-formed input; callers run these checks at
//! their boundary before handing payloads over.

use crate::error::JobBoardError;
use crate::job::{JobPatch, NewJob};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// A machine-friendly validation code.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationCode {
    Required,
    Range,
}

impl ValidationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Range => "range",
        }
    }
}

impl Serialize for ValidationCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: &'static str,
    pub code: ValidationCode,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, code: ValidationCode, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
        }
    }
}

/// A collection of validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub items: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn push(&mut self, err: ValidationError) {
        self.items.push(err);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.items.iter()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

impl From<ValidationErrors> for JobBoardError {
    fn from(errors: ValidationErrors) -> Self {
        JobBoardError::Validation(errors.to_string())
    }
}

fn check_title(errors: &mut ValidationErrors, title: &str) {
    if title.trim().is_empty() {
        errors.push(ValidationError::new(
            "title",
            ValidationCode::Required,
            "must not be empty",
        ));
    }
}

fn check_salary(errors: &mut ValidationErrors, salary: Option<i32>) {
    if salary.is_some_and(|s| s < 0) {
        errors.push(ValidationError::new(
            "salary",
            ValidationCode::Range,
            "must be at least 0",
        ));
    }
}

fn check_equity(errors: &mut ValidationErrors, equity: Option<Decimal>) {
    if equity.is_some_and(|e| e < Decimal::ZERO || e > Decimal::ONE) {
        errors.push(ValidationError::new(
            "equity",
            ValidationCode::Range,
            "must be between 0 and 1",
        ));
    }
}

fn check_company_handle(errors: &mut ValidationErrors, handle: &str) {
    if handle.trim().is_empty() {
        errors.push(ValidationError::new(
            "companyHandle",
            ValidationCode::Required,
            "must not be empty",
        ));
    }
}

impl NewJob {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        check_title(&mut errors, &self.title);
        check_salary(&mut errors, self.salary);
        check_equity(&mut errors, self.equity);
        check_company_handle(&mut errors, &self.company_handle);
        errors.into_result()
    }
}

impl JobPatch {
    /// Checks present fields only; an empty patch passes here and is rejected by
    /// the repository.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if let Some(title) = &self.title {
            check_title(&mut errors, title);
        }
        if let Some(salary) = self.salary {
            check_salary(&mut errors, salary);
        }
        if let Some(equity) = self.equity {
            check_equity(&mut errors, equity);
        }
        if let Some(handle) = &self.company_handle {
            check_company_handle(&mut errors, handle);
        }
        errors.into_result()
    }
}
