//! The stored-record contract
//!
//! Anything the repository engine persists implements [`Entity`]. The
//! metadata the engine needs (field list, column overrides) is declared
//! statically by each record type, so no runtime reflection is involved
//! and the column mapping is visible at the definition site.

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};
use sqlx::Postgres;

use crate::validation::ValidationErrors;

/// A persistable record with a single-column primary key.
///
/// The serde bounds drive the struct ⇄ row-map conversion in
/// [`crate::convert`]; `Default` supplies the baseline the converter
/// overlays row data onto, which is what lets partial rows deserialize.
pub trait Entity:
    Clone + Send + Sync + Debug + Default + Serialize + DeserializeOwned + Unpin + 'static
{
    /// Primary key type. The sqlx bounds let the engine bind it as a
    /// parameter and read it back from `RETURNING`.
    type Id: Clone
        + Send
        + Sync
        + Debug
        + PartialEq
        + Unpin
        + for<'q> sqlx::Encode<'q, Postgres>
        + for<'r> sqlx::Decode<'r, Postgres>
        + sqlx::Type<Postgres>
        + 'static;

    /// Current id, `None` for records not yet persisted.
    fn id(&self) -> Option<Self::Id>;

    /// Write back the id generated on insert.
    fn set_id(&mut self, id: Self::Id);

    /// Check the record's own field rules. The manager layer calls this
    /// before every write.
    fn validate(&self) -> Result<(), ValidationErrors>;

    /// All serialized field names, in declaration order. This is the
    /// complete set the converter will populate when rebuilding a record
    /// from a row.
    fn field_names() -> &'static [&'static str];

    /// Field → column renames for the cases where the snake_case
    /// derivation is not the column name. Unlisted fields use
    /// [`crate::convert::to_column_name`].
    fn column_overrides() -> &'static [(&'static str, &'static str)] {
        &[]
    }
}
