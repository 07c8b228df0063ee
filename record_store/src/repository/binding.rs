//! Table binding: the executor-agnostic SQL core
//!
//! [`TableBinding`] pairs a validated table/id-column with a record type
//! and implements every CRUD operation against an `impl PgExecutor<'_>`.
//! Pool-backed repositories and transaction scopes both delegate here, so
//! a statement is assembled and bound exactly one way regardless of which
//! execution context runs it.

use std::marker::PhantomData;

use sqlx::postgres::PgExecutor;

use crate::convert::{from_row, to_row};
use crate::entity::Entity;
use crate::errors::StoreError;
use crate::filter::Filter;
use crate::identifiers::{IdentifierError, ValidatedColumnName, ValidatedTableName};
use crate::repository::DeletePolicy;
use crate::value::{bind_sql_value, decode_row};

pub(crate) struct TableBinding<T: Entity> {
    table: ValidatedTableName,
    id_column: ValidatedColumnName,
    delete_policy: DeletePolicy,
    search_columns: Vec<ValidatedColumnName>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Entity> Clone for TableBinding<T> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            id_column: self.id_column.clone(),
            delete_policy: self.delete_policy,
            search_columns: self.search_columns.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: Entity> TableBinding<T> {
    pub(crate) fn new(table: &str, id_column: &str) -> Result<Self, IdentifierError> {
        Ok(Self {
            table: ValidatedTableName::new(table)?,
            id_column: ValidatedColumnName::new(id_column)?,
            delete_policy: DeletePolicy::default(),
            search_columns: Vec::new(),
            _record: PhantomData,
        })
    }

    pub(crate) fn set_delete_policy(&mut self, policy: DeletePolicy) {
        self.delete_policy = policy;
    }

    pub(crate) fn set_search_columns(&mut self, columns: &[&str]) -> Result<(), IdentifierError> {
        self.search_columns = columns
            .iter()
            .map(|c| ValidatedColumnName::new(c))
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    pub(crate) fn table_name(&self) -> &str {
        self.table.as_str()
    }

    pub(crate) fn id_column(&self) -> &str {
        self.id_column.as_str()
    }

    pub(crate) fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }

    fn invalid(&self, operation: &'static str, message: &str) -> StoreError {
        StoreError::invalid_argument(operation, self.table.as_str(), message)
    }

    // -- statement assembly (pure, tested without a database) --

    fn insert_sql(&self, columns: &[&str]) -> String {
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${i}")).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            self.table,
            columns.join(", "),
            placeholders.join(", "),
            self.id_column,
        )
    }

    fn update_sql(&self, columns: &[&str]) -> String {
        let assignments: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ${}", column, i + 1))
            .collect();
        format!(
            "UPDATE {} SET {} WHERE {} = ${}",
            self.table,
            assignments.join(", "),
            self.id_column,
            columns.len() + 1,
        )
    }

    fn delete_sql(&self) -> String {
        format!("DELETE FROM {} WHERE {} = $1", self.table, self.id_column)
    }

    fn select_by_id_sql(&self) -> String {
        format!("SELECT * FROM {} WHERE {} = $1", self.table, self.id_column)
    }

    fn select_by_ids_sql(&self, count: usize) -> String {
        let placeholders: Vec<String> = (1..=count).map(|i| format!("${i}")).collect();
        format!(
            "SELECT * FROM {} WHERE {} IN ({})",
            self.table,
            self.id_column,
            placeholders.join(", "),
        )
    }

    fn exists_sql(&self) -> String {
        format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = $1)",
            self.table, self.id_column,
        )
    }

    // -- operations --

    /// INSERT every column except the id, read the generated id back, and
    /// write it into the record.
    pub(crate) async fn create(
        &self,
        executor: impl PgExecutor<'_>,
        record: &mut T,
    ) -> Result<(), StoreError> {
        let mut row = to_row(record)?;
        row.remove(self.id_column.as_str());
        if row.is_empty() {
            return Err(self.invalid("create", "record has no insertable columns"));
        }

        let columns: Vec<&str> = row.keys().map(String::as_str).collect();
        let sql = self.insert_sql(&columns);
        tracing::debug!(table = %self.table, sql = %sql, "create");

        let mut query = sqlx::query_scalar::<_, T::Id>(&sql);
        for value in row.values() {
            query = bind_sql_value!(query, value.clone());
        }
        let id = query
            .fetch_one(executor)
            .await
            .map_err(|e| StoreError::from_sqlx("create", self.table.as_str(), e))?;
        record.set_id(id);
        Ok(())
    }

    /// UPDATE every non-id column of the row identified by the record's
    /// own id. Returns the affected-row count; zero means no such row.
    pub(crate) async fn update(
        &self,
        executor: impl PgExecutor<'_>,
        record: &T,
    ) -> Result<u64, StoreError> {
        let id = record
            .id()
            .ok_or_else(|| self.invalid("update", "record id is required"))?;
        let mut row = to_row(record)?;
        row.remove(self.id_column.as_str());
        if row.is_empty() {
            return Err(self.invalid("update", "record has no updatable columns"));
        }

        let columns: Vec<&str> = row.keys().map(String::as_str).collect();
        let sql = self.update_sql(&columns);
        tracing::debug!(table = %self.table, sql = %sql, "update");

        let mut query = sqlx::query(&sql);
        for value in row.values() {
            query = bind_sql_value!(query, value.clone());
        }
        let result = query
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| StoreError::from_sqlx("update", self.table.as_str(), e))?;
        Ok(result.rows_affected())
    }

    /// DELETE by id. What a missing row means depends on the configured
    /// [`DeletePolicy`].
    pub(crate) async fn delete(
        &self,
        executor: impl PgExecutor<'_>,
        id: &T::Id,
    ) -> Result<bool, StoreError> {
        let sql = self.delete_sql();
        tracing::debug!(table = %self.table, sql = %sql, "delete");

        let result = sqlx::query(&sql)
            .bind(id.clone())
            .execute(executor)
            .await
            .map_err(|e| StoreError::from_sqlx("delete", self.table.as_str(), e))?;
        let deleted = result.rows_affected() > 0;
        if !deleted && self.delete_policy == DeletePolicy::FailOnMissing {
            return Err(StoreError::NotFound {
                table: self.table.as_str().to_string(),
                id_column: self.id_column.as_str().to_string(),
                id: format!("{id:?}"),
            });
        }
        Ok(deleted)
    }

    pub(crate) async fn get_by_id(
        &self,
        executor: impl PgExecutor<'_>,
        id: &T::Id,
    ) -> Result<Option<T>, StoreError> {
        let sql = self.select_by_id_sql();
        tracing::trace!(table = %self.table, sql = %sql, "get_by_id");

        let row = sqlx::query(&sql)
            .bind(id.clone())
            .fetch_optional(executor)
            .await
            .map_err(|e| StoreError::from_sqlx("get_by_id", self.table.as_str(), e))?;
        match row {
            Some(row) => {
                let map = decode_row(self.table.as_str(), &row)?;
                Ok(Some(from_row(&map)?))
            }
            None => Ok(None),
        }
    }

    /// Fetch all rows whose id appears in `ids`. Ids bind in caller order;
    /// result order is whatever the database returns. Missing ids are
    /// simply absent from the result.
    pub(crate) async fn get_by_ids(
        &self,
        executor: impl PgExecutor<'_>,
        ids: &[T::Id],
    ) -> Result<Vec<T>, StoreError> {
        if ids.is_empty() {
            return Err(self.invalid("get_by_ids", "id list is empty"));
        }

        let sql = self.select_by_ids_sql(ids.len());
        tracing::trace!(table = %self.table, sql = %sql, count = ids.len(), "get_by_ids");

        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id.clone());
        }
        let rows = query
            .fetch_all(executor)
            .await
            .map_err(|e| StoreError::from_sqlx("get_by_ids", self.table.as_str(), e))?;
        rows.iter()
            .map(|row| {
                let map = decode_row(self.table.as_str(), row)?;
                Ok(from_row(&map)?)
            })
            .collect()
    }

    pub(crate) async fn list(
        &self,
        executor: impl PgExecutor<'_>,
        filter: &Filter,
    ) -> Result<Vec<T>, StoreError> {
        let clauses = filter.to_sql(self.table.as_str(), &self.search_columns)?;
        let sql = format!(
            "SELECT * FROM {}{}{}{}",
            self.table, clauses.where_sql, clauses.order_sql, clauses.page_sql,
        );
        tracing::trace!(table = %self.table, sql = %sql, "list");

        let mut query = sqlx::query(&sql);
        for value in clauses.params {
            query = bind_sql_value!(query, value);
        }
        let rows = query
            .fetch_all(executor)
            .await
            .map_err(|e| StoreError::from_sqlx("list", self.table.as_str(), e))?;
        rows.iter()
            .map(|row| {
                let map = decode_row(self.table.as_str(), row)?;
                Ok(from_row(&map)?)
            })
            .collect()
    }

    /// COUNT matching rows. Ordering and pagination on the filter are
    /// deliberately not applied.
    pub(crate) async fn count(
        &self,
        executor: impl PgExecutor<'_>,
        filter: &Filter,
    ) -> Result<i64, StoreError> {
        let clauses = filter.to_sql(self.table.as_str(), &self.search_columns)?;
        let sql = format!("SELECT COUNT(*) FROM {}{}", self.table, clauses.where_sql);
        tracing::trace!(table = %self.table, sql = %sql, "count");

        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for value in clauses.params {
            query = bind_sql_value!(query, value);
        }
        query
            .fetch_one(executor)
            .await
            .map_err(|e| StoreError::from_sqlx("count", self.table.as_str(), e))
    }

    pub(crate) async fn exists(
        &self,
        executor: impl PgExecutor<'_>,
        id: &T::Id,
    ) -> Result<bool, StoreError> {
        let sql = self.exists_sql();
        tracing::trace!(table = %self.table, sql = %sql, "exists");

        sqlx::query_scalar::<_, bool>(&sql)
            .bind(id.clone())
            .fetch_one(executor)
            .await
            .map_err(|e| StoreError::from_sqlx("exists", self.table.as_str(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrors;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct Row {
        row_id: Option<i32>,
        label: String,
    }

    impl Entity for Row {
        type Id = i32;

        fn id(&self) -> Option<i32> {
            self.row_id
        }

        fn set_id(&mut self, id: i32) {
            self.row_id = Some(id);
        }

        fn validate(&self) -> Result<(), ValidationErrors> {
            Ok(())
        }

        fn field_names() -> &'static [&'static str] {
            &["row_id", "label"]
        }
    }

    fn binding() -> TableBinding<Row> {
        TableBinding::new("sample", "row_id").unwrap()
    }

    #[test]
    fn insert_statement_returns_generated_id() {
        assert_eq!(
            binding().insert_sql(&["label", "weight"]),
            "INSERT INTO sample (label, weight) VALUES ($1, $2) RETURNING row_id"
        );
    }

    #[test]
    fn update_statement_binds_id_last() {
        assert_eq!(
            binding().update_sql(&["label", "weight"]),
            "UPDATE sample SET label = $1, weight = $2 WHERE row_id = $3"
        );
    }

    #[test]
    fn delete_and_select_statements() {
        let b = binding();
        assert_eq!(b.delete_sql(), "DELETE FROM sample WHERE row_id = $1");
        assert_eq!(
            b.select_by_id_sql(),
            "SELECT * FROM sample WHERE row_id = $1"
        );
        assert_eq!(
            b.select_by_ids_sql(3),
            "SELECT * FROM sample WHERE row_id IN ($1, $2, $3)"
        );
        assert_eq!(
            b.exists_sql(),
            "SELECT EXISTS(SELECT 1 FROM sample WHERE row_id = $1)"
        );
    }

    #[test]
    fn constructor_rejects_bad_identifiers() {
        assert!(TableBinding::<Row>::new("sample; --", "row_id").is_err());
        assert!(TableBinding::<Row>::new("sample", "row id").is_err());
    }
}
