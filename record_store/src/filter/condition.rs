//! Single-condition model: field, operator, operand.

use crate::value::SqlValue;

/// Comparison operators supported by the filter engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
    ILike,
    In,
    IsNull,
    IsNotNull,
}

impl Operator {
    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Like => "LIKE",
            Operator::ILike => "ILIKE",
            Operator::In => "IN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
        }
    }
}

/// Right-hand side of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// No operand; used by null tests, and turns `Eq`/`Ne` into
    /// `IS NULL`/`IS NOT NULL`.
    None,
    Value(SqlValue),
    List(Vec<SqlValue>),
}

/// One predicate over one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub operand: Operand,
}

impl Condition {
    pub fn new(field: &str, operator: Operator, operand: Operand) -> Self {
        Self {
            field: field.to_string(),
            operator,
            operand,
        }
    }
}
