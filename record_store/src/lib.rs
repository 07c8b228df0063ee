//! Record Store - generic data-access engine for Gradus
//!
//! This crate provides the foundational types for persistence: the record
//! contract, the struct ⇄ row-map converter, the filter/query model, and
//! the pool- and transaction-scoped repository engine.

pub mod convert;
pub mod entity;
pub mod errors;
pub mod filter;
pub mod identifiers;
pub mod prelude;
pub mod repository;
pub mod traits;
pub mod validation;
pub mod value;

pub use convert::{column_for, from_row, to_column_name, to_row};
pub use entity::Entity;
pub use errors::{MapError, StoreError};
pub use filter::{Condition, Filter, Operand, Operator};
pub use identifiers::{IdentifierError, ValidatedColumnName, ValidatedTableName};
pub use repository::{DeletePolicy, Repository, TxRepository};
pub use traits::RecordStore;
pub use validation::ValidationErrors;
pub use value::{RowMap, SqlValue};

use sqlx::PgPool;

pub type DbPool = PgPool;
