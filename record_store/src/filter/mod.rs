//! Query filtering
//!
//! A [`Filter`] carries conditions, ordering, pagination, and an optional
//! free-text search hint; the repository turns it into a WHERE/ORDER
//! BY/LIMIT tail with positional parameters. Filters know nothing about
//! tables or connections, so one filter value can drive `list`, `count`,
//! and reusable domain queries alike.

mod condition;
mod sql;

pub use condition::{Condition, Operand, Operator};

use crate::value::SqlValue;

/// Declarative query description consumed by `list` and `count`.
///
/// All builder methods take and return `self`, so filters chain:
///
/// ```
/// use record_store::Filter;
///
/// let filter = Filter::new()
///     .eq("group_id", 3)
///     .is_not_null("phone_number")
///     .order_by("surname, name")
///     .limit(50);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub(crate) conditions: Vec<Condition>,
    pub(crate) order_by: Option<String>,
    pub(crate) limit: Option<i64>,
    pub(crate) offset: Option<i64>,
    pub(crate) search: Option<String>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an already-built condition.
    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn eq(self, field: &str, value: impl Into<SqlValue>) -> Self {
        self.condition(Condition::new(field, Operator::Eq, Operand::Value(value.into())))
    }

    pub fn ne(self, field: &str, value: impl Into<SqlValue>) -> Self {
        self.condition(Condition::new(field, Operator::Ne, Operand::Value(value.into())))
    }

    pub fn lt(self, field: &str, value: impl Into<SqlValue>) -> Self {
        self.condition(Condition::new(field, Operator::Lt, Operand::Value(value.into())))
    }

    pub fn lte(self, field: &str, value: impl Into<SqlValue>) -> Self {
        self.condition(Condition::new(field, Operator::Lte, Operand::Value(value.into())))
    }

    pub fn gt(self, field: &str, value: impl Into<SqlValue>) -> Self {
        self.condition(Condition::new(field, Operator::Gt, Operand::Value(value.into())))
    }

    pub fn gte(self, field: &str, value: impl Into<SqlValue>) -> Self {
        self.condition(Condition::new(field, Operator::Gte, Operand::Value(value.into())))
    }

    pub fn like(self, field: &str, pattern: impl Into<String>) -> Self {
        self.condition(Condition::new(
            field,
            Operator::Like,
            Operand::Value(SqlValue::Text(pattern.into())),
        ))
    }

    pub fn ilike(self, field: &str, pattern: impl Into<String>) -> Self {
        self.condition(Condition::new(
            field,
            Operator::ILike,
            Operand::Value(SqlValue::Text(pattern.into())),
        ))
    }

    /// Membership test. An empty list matches nothing.
    pub fn in_values<V>(self, field: &str, values: impl IntoIterator<Item = V>) -> Self
    where
        V: Into<SqlValue>,
    {
        self.condition(Condition::new(
            field,
            Operator::In,
            Operand::List(values.into_iter().map(Into::into).collect()),
        ))
    }

    pub fn is_null(self, field: &str) -> Self {
        self.condition(Condition::new(field, Operator::IsNull, Operand::None))
    }

    pub fn is_not_null(self, field: &str) -> Self {
        self.condition(Condition::new(field, Operator::IsNotNull, Operand::None))
    }

    /// Raw ordering expression, `column [asc|desc]` segments separated by
    /// commas. Validated lexically before it reaches SQL.
    pub fn order_by(mut self, order: impl Into<String>) -> Self {
        self.order_by = Some(order.into());
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Free-text search hint. Which columns it searches is decided by the
    /// repository the filter is handed to; repositories with no searchable
    /// columns ignore the hint.
    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
            && self.order_by.is_none()
            && self.limit.is_none()
            && self.offset.is_none()
            && self.search.is_none()
    }
}
