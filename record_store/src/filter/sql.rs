//! Filter → SQL clause generation
//!
//! Produces the statement tail (`WHERE`, `ORDER BY`, `LIMIT`/`OFFSET`) and
//! the parameter list in binding order. Parameters are always positional
//! (`$1`, `$2`, ...); for an `IN` list every element gets its own
//! placeholder, and the elements are appended to the parameter list in the
//! same order the placeholders appear.

use crate::errors::StoreError;
use crate::filter::condition::{Condition, Operand, Operator};
use crate::filter::Filter;
use crate::identifiers::{validate_order_by, ValidatedColumnName};
use crate::value::SqlValue;

/// Rendered statement tail. Each piece carries its own leading space so it
/// can be appended verbatim, or be empty.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct SqlClauses {
    pub where_sql: String,
    pub order_sql: String,
    pub page_sql: String,
    pub params: Vec<SqlValue>,
}

impl Filter {
    /// Render the full tail. `search_columns` is the repository's
    /// searchable-column set; a search hint with no columns configured is
    /// dropped with a debug log.
    pub(crate) fn to_sql(
        &self,
        table: &str,
        search_columns: &[ValidatedColumnName],
    ) -> Result<SqlClauses, StoreError> {
        let mut clauses = SqlClauses::default();
        let mut conjuncts = Vec::new();
        let mut next_param = 1usize;

        for condition in &self.conditions {
            conjuncts.push(render_condition(
                table,
                condition,
                &mut next_param,
                &mut clauses.params,
            )?);
        }

        if let Some(query) = &self.search {
            if search_columns.is_empty() {
                tracing::debug!(table = %table, "search hint ignored: no searchable columns configured");
            } else {
                let pattern = format!("%{query}%");
                let mut alternatives = Vec::with_capacity(search_columns.len());
                for column in search_columns {
                    alternatives.push(format!("{} ILIKE ${}", column, next_param));
                    next_param += 1;
                    clauses.params.push(SqlValue::Text(pattern.clone()));
                }
                conjuncts.push(format!("({})", alternatives.join(" OR ")));
            }
        }

        if !conjuncts.is_empty() {
            clauses.where_sql = format!(" WHERE {}", conjuncts.join(" AND "));
        }

        if let Some(order) = &self.order_by {
            clauses.order_sql = format!(" ORDER BY {}", validate_order_by(order)?);
        }

        if let Some(limit) = self.limit {
            if limit < 0 {
                return Err(StoreError::invalid_argument(
                    "list",
                    table,
                    "limit must not be negative",
                ));
            }
            clauses.page_sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            if offset < 0 {
                return Err(StoreError::invalid_argument(
                    "list",
                    table,
                    "offset must not be negative",
                ));
            }
            clauses.page_sql.push_str(&format!(" OFFSET {offset}"));
        }

        Ok(clauses)
    }
}

fn render_condition(
    table: &str,
    condition: &Condition,
    next_param: &mut usize,
    params: &mut Vec<SqlValue>,
) -> Result<String, StoreError> {
    let column = ValidatedColumnName::new(&condition.field)?;

    match (condition.operator, &condition.operand) {
        (Operator::IsNull, _) => Ok(format!("{column} IS NULL")),
        (Operator::IsNotNull, _) => Ok(format!("{column} IS NOT NULL")),

        // Equality against an absent operand degrades to a null test.
        (Operator::Eq, Operand::None) => Ok(format!("{column} IS NULL")),
        (Operator::Ne, Operand::None) => Ok(format!("{column} IS NOT NULL")),
        (Operator::Eq, Operand::Value(SqlValue::Null)) => Ok(format!("{column} IS NULL")),
        (Operator::Ne, Operand::Value(SqlValue::Null)) => Ok(format!("{column} IS NOT NULL")),

        (Operator::In, Operand::List(values)) => {
            if values.is_empty() {
                // Matches nothing, by definition of IN over an empty set.
                return Ok("1=0".to_string());
            }
            let mut placeholders = Vec::with_capacity(values.len());
            for value in values {
                placeholders.push(format!("${}", *next_param));
                *next_param += 1;
                params.push(value.clone());
            }
            Ok(format!("{} IN ({})", column, placeholders.join(", ")))
        }
        (Operator::In, _) => Err(StoreError::invalid_argument(
            "filter",
            table,
            format!("IN condition on {column} requires a list operand"),
        )),

        (op, Operand::Value(value)) => {
            let sql = format!("{} {} ${}", column, op.as_sql(), *next_param);
            *next_param += 1;
            params.push(value.clone());
            Ok(sql)
        }
        (op, _) => Err(StoreError::invalid_argument(
            "filter",
            table,
            format!("operator {} on {column} requires a value operand", op.as_sql()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<ValidatedColumnName> {
        names
            .iter()
            .map(|n| ValidatedColumnName::new(n).unwrap())
            .collect()
    }

    #[test]
    fn empty_filter_renders_nothing() {
        let clauses = Filter::new().to_sql("student", &[]).unwrap();
        assert_eq!(clauses, SqlClauses::default());
    }

    #[test]
    fn conditions_join_with_and_in_declaration_order() {
        let clauses = Filter::new()
            .eq("group_id", 3)
            .gte("birthday", "2000-01-01")
            .to_sql("student", &[])
            .unwrap();
        assert_eq!(
            clauses.where_sql,
            " WHERE group_id = $1 AND birthday >= $2"
        );
        assert_eq!(
            clauses.params,
            vec![
                SqlValue::Int(3),
                SqlValue::Date(chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()),
            ]
        );
    }

    #[test]
    fn in_gets_one_placeholder_per_element() {
        let clauses = Filter::new()
            .in_values("student_id", [5, 7, 9])
            .to_sql("student", &[])
            .unwrap();
        assert_eq!(clauses.where_sql, " WHERE student_id IN ($1, $2, $3)");
        assert_eq!(
            clauses.params,
            vec![SqlValue::Int(5), SqlValue::Int(7), SqlValue::Int(9)]
        );
    }

    #[test]
    fn empty_in_matches_nothing() {
        let clauses = Filter::new()
            .in_values::<i32>("student_id", [])
            .to_sql("student", &[])
            .unwrap();
        assert_eq!(clauses.where_sql, " WHERE 1=0");
        assert!(clauses.params.is_empty());
    }

    #[test]
    fn parameter_numbering_continues_across_in_lists() {
        let clauses = Filter::new()
            .eq("group_id", 1)
            .in_values("student_id", [2, 3])
            .gt("grade", 60)
            .to_sql("assessment", &[])
            .unwrap();
        assert_eq!(
            clauses.where_sql,
            " WHERE group_id = $1 AND student_id IN ($2, $3) AND grade > $4"
        );
        assert_eq!(clauses.params.len(), 4);
    }

    #[test]
    fn null_tests_bind_nothing() {
        let clauses = Filter::new()
            .is_null("father_name")
            .is_not_null("phone_number")
            .to_sql("student", &[])
            .unwrap();
        assert_eq!(
            clauses.where_sql,
            " WHERE father_name IS NULL AND phone_number IS NOT NULL"
        );
        assert!(clauses.params.is_empty());
    }

    #[test]
    fn eq_against_null_degrades_to_is_null() {
        let clauses = Filter::new()
            .eq("father_name", SqlValue::Null)
            .ne("phone_number", SqlValue::Null)
            .to_sql("student", &[])
            .unwrap();
        assert_eq!(
            clauses.where_sql,
            " WHERE father_name IS NULL AND phone_number IS NOT NULL"
        );
        assert!(clauses.params.is_empty());
    }

    #[test]
    fn missing_operand_is_an_error_for_ordering_operators() {
        let filter = Filter::new().condition(Condition::new(
            "grade",
            Operator::Gt,
            Operand::None,
        ));
        assert!(matches!(
            filter.to_sql("assessment", &[]),
            Err(StoreError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn invalid_field_name_is_rejected_before_sql() {
        let filter = Filter::new().eq("group_id; DROP TABLE student", 1);
        assert!(matches!(
            filter.to_sql("student", &[]),
            Err(StoreError::Identifier(_))
        ));
    }

    #[test]
    fn order_limit_offset_render_after_where() {
        let clauses = Filter::new()
            .eq("group_id", 3)
            .order_by("surname, name desc")
            .limit(25)
            .offset(50)
            .to_sql("student", &[])
            .unwrap();
        assert_eq!(clauses.order_sql, " ORDER BY surname ASC, name DESC");
        assert_eq!(clauses.page_sql, " LIMIT 25 OFFSET 50");
    }

    #[test]
    fn negative_pagination_is_rejected() {
        assert!(Filter::new().limit(-1).to_sql("student", &[]).is_err());
        assert!(Filter::new().offset(-5).to_sql("student", &[]).is_err());
    }

    #[test]
    fn search_expands_over_configured_columns() {
        let clauses = Filter::new()
            .eq("group_id", 3)
            .search("ivan")
            .to_sql("student", &columns(&["surname", "name"]))
            .unwrap();
        assert_eq!(
            clauses.where_sql,
            " WHERE group_id = $1 AND (surname ILIKE $2 OR name ILIKE $3)"
        );
        assert_eq!(
            clauses.params[1..],
            [
                SqlValue::Text("%ivan%".to_string()),
                SqlValue::Text("%ivan%".to_string()),
            ]
        );
    }

    #[test]
    fn search_without_columns_is_ignored() {
        let clauses = Filter::new().search("ivan").to_sql("student", &[]).unwrap();
        assert_eq!(clauses.where_sql, "");
        assert!(clauses.params.is_empty());
    }
}
