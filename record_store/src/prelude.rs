//! Convenience re-exports for common record-store usage

// Core contract and engine
pub use crate::entity::Entity;
pub use crate::repository::{DeletePolicy, Repository, TxRepository};
pub use crate::traits::RecordStore;

// Conversion layer
pub use crate::convert::{from_row, to_column_name, to_row};
pub use crate::value::{RowMap, SqlValue};

// Query building
pub use crate::filter::{Condition, Filter, Operand, Operator};

// Errors and validation
pub use crate::errors::{MapError, StoreError};
pub use crate::identifiers::{ValidatedColumnName, ValidatedTableName};
pub use crate::validation::{rules, ValidationErrors};

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
pub use sqlx::PgPool;
