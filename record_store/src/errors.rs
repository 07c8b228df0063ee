//! Error types for the record store engine
//!
//! Every database-facing error carries the operation name and table it
//! occurred on, so callers and logs can tell *which* store call failed
//! without string-parsing driver messages.

use thiserror::Error;

use crate::identifiers::IdentifierError;
use crate::validation::ValidationErrors;

/// Errors from the struct ⇄ row-map converter.
#[derive(Error, Debug)]
pub enum MapError {
    /// The value does not serialize to a key/value record (e.g. a scalar
    /// or a sequence was passed where a struct with named fields belongs).
    #[error("{0} does not serialize to a record with named fields")]
    UnsupportedShape(&'static str),

    /// The target type cannot absorb a row map (its serialized form is not
    /// an object).
    #[error("{0} is not a record type and cannot be built from a row")]
    InvalidTarget(&'static str),

    /// A column value could not be converted into the target field type
    /// (narrowing overflow, malformed temporal string, type mismatch).
    #[error("cannot convert row data for {record}: {detail}")]
    Conversion { record: &'static str, detail: String },
}

/// Errors produced by repository and transaction operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The caller passed something unusable before any SQL was issued
    /// (missing id, empty id list, operator without an operand, ...).
    #[error("invalid argument for {operation} on {table}: {message}")]
    InvalidArgument {
        operation: &'static str,
        table: String,
        message: String,
    },

    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The database rejected the statement with an integrity error
    /// (unique, foreign key, not-null, check: SQLSTATE class 23).
    #[error("{operation} on {table} violated a database constraint")]
    ConstraintViolation {
        operation: &'static str,
        table: String,
        constraint: Option<String>,
        #[source]
        source: sqlx::Error,
    },

    /// Transport, pool, or unclassified database failure.
    #[error("{operation} on {table} failed")]
    Connection {
        operation: &'static str,
        table: String,
        #[source]
        source: sqlx::Error,
    },

    /// The operation exceeded its deadline (pool acquire or transaction
    /// body timeout).
    #[error("{operation} on {table} timed out")]
    Timeout {
        operation: &'static str,
        table: String,
    },

    /// The statement was cancelled server-side (SQLSTATE 57014).
    #[error("{operation} on {table} was cancelled")]
    Cancelled {
        operation: &'static str,
        table: String,
    },

    /// A row that was required to exist does not.
    #[error("no row in {table} with {id_column} = {id}")]
    NotFound {
        table: String,
        id_column: String,
        id: String,
    },

    /// COMMIT itself failed; the transaction's effects must be assumed lost.
    #[error("commit failed")]
    Commit(#[source] sqlx::Error),

    /// ROLLBACK itself failed; the server discards the transaction when the
    /// connection is returned, but the failure is still worth surfacing.
    #[error("rollback failed")]
    Rollback(#[source] sqlx::Error),

    /// A result column has a SQL type the dynamic decoder does not handle.
    #[error("column {column} of {table} has unsupported type {type_name}")]
    UnsupportedColumn {
        table: String,
        column: String,
        type_name: String,
    },
}

impl StoreError {
    pub fn invalid_argument(
        operation: &'static str,
        table: &str,
        message: impl Into<String>,
    ) -> Self {
        StoreError::InvalidArgument {
            operation,
            table: table.to_string(),
            message: message.into(),
        }
    }

    /// Classify a driver error by SQLSTATE so callers can distinguish
    /// retryable transport faults from data problems.
    pub(crate) fn from_sqlx(operation: &'static str, table: &str, err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) => {
                let code = db.code().map(|c| c.to_string()).unwrap_or_default();
                if code.starts_with("23") {
                    let constraint = db.constraint().map(str::to_string);
                    return StoreError::ConstraintViolation {
                        operation,
                        table: table.to_string(),
                        constraint,
                        source: err,
                    };
                }
                if code == "57014" {
                    return StoreError::Cancelled {
                        operation,
                        table: table.to_string(),
                    };
                }
                StoreError::Connection {
                    operation,
                    table: table.to_string(),
                    source: err,
                }
            }
            sqlx::Error::PoolTimedOut => StoreError::Timeout {
                operation,
                table: table.to_string(),
            },
            _ => StoreError::Connection {
                operation,
                table: table.to_string(),
                source: err,
            },
        }
    }
}
