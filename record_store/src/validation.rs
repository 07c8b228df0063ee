//! Declarative record validation
//!
//! Records validate themselves before any write reaches the database
//! (see [`crate::entity::Entity::validate`]). Failures accumulate per
//! field instead of stopping at the first problem, so a caller can show
//! every broken field at once.

use std::collections::BTreeMap;
use std::fmt;

/// Field-level validation failures, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn message(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }

    /// Fold accumulated failures into a `Result`, for the tail of a
    /// `validate` implementation.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Merge another error set under a `prefix.` namespace; used when
    /// validating batches to keep per-item failures distinguishable.
    pub fn merge_prefixed(&mut self, prefix: &str, other: ValidationErrors) {
        for (field, message) in other.0 {
            self.0.insert(format!("{prefix}.{field}"), message);
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Reusable field rules. Each rule records at most one failure per call;
/// later failures on the same field overwrite earlier ones, so apply the
/// cheapest rule last if ordering matters.
pub mod rules {
    use super::ValidationErrors;
    use chrono::NaiveDate;

    pub fn required<T>(errors: &mut ValidationErrors, field: &str, value: &Option<T>) {
        if value.is_none() {
            errors.add(field, "is required");
        }
    }

    pub fn required_str(errors: &mut ValidationErrors, field: &str, value: &str) {
        if value.trim().is_empty() {
            errors.add(field, "is required");
        }
    }

    pub fn length(errors: &mut ValidationErrors, field: &str, value: &str, min: usize, max: usize) {
        let count = value.chars().count();
        if count < min || count > max {
            errors.add(
                field,
                format!("length must be between {min} and {max} characters"),
            );
        }
    }

    pub fn range<T>(errors: &mut ValidationErrors, field: &str, value: T, min: T, max: T)
    where
        T: PartialOrd + std::fmt::Display,
    {
        if value < min || value > max {
            errors.add(field, format!("must be between {min} and {max}"));
        }
    }

    /// The date must not lie in the future (birthdays, attendance marks).
    pub fn date_in_past(errors: &mut ValidationErrors, field: &str, value: Option<NaiveDate>) {
        if let Some(date) = value {
            if date > chrono::Utc::now().date_naive() {
                errors.add(field, "must not be in the future");
            }
        }
    }

    /// Exactly `digits` ASCII digits, nothing else (phone numbers).
    pub fn exact_digits(errors: &mut ValidationErrors, field: &str, value: &str, digits: usize) {
        if value.len() != digits || !value.bytes().all(|b| b.is_ascii_digit()) {
            errors.add(field, format!("must be exactly {digits} digits"));
        }
    }
}
