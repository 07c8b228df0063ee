//! Struct ⇄ row-map conversion
//!
//! Records cross into SQL land as [`RowMap`]s: column name → [`SqlValue`].
//! The conversion rides on serde: a record serializes to a JSON object,
//! each field value lifts into a `SqlValue`, and field names map to column
//! names via explicit overrides or snake_case derivation. The reverse
//! direction overlays row values onto the record's `Default` serialization,
//! so columns missing from a row simply keep their default.

use std::any::type_name;

use serde_json::Value;

use crate::entity::Entity;
use crate::errors::MapError;
use crate::value::{RowMap, SqlValue};

/// Derive a column name from a field name: `UserID` → `user_id`,
/// `HTMLParser` → `html_parser`, `already_snake` stays as is.
///
/// An underscore is inserted before an uppercase letter when the previous
/// character is lowercase or a digit, or when the letter starts a new word
/// inside an acronym run (the next character is lowercase).
pub fn to_column_name(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = String::with_capacity(bytes.len() + 4);
    for (i, &c) in bytes.iter().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                let prev = bytes[i - 1];
                let next_is_lower = bytes.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
                if prev.is_ascii_lowercase() || prev.is_ascii_digit() || next_is_lower {
                    out.push('_');
                }
            }
            out.push(c.to_ascii_lowercase() as char);
        } else {
            out.push(c as char);
        }
    }
    out
}

/// Column name for a record field: explicit override first, snake_case
/// derivation otherwise.
pub fn column_for<T: Entity>(field: &str) -> String {
    for (f, column) in T::column_overrides() {
        if *f == field {
            return (*column).to_string();
        }
    }
    to_column_name(field)
}

/// Serialize a record into a row map keyed by column name.
pub fn to_row<T: Entity>(record: &T) -> Result<RowMap, MapError> {
    let serialized = serde_json::to_value(record).map_err(|e| MapError::Conversion {
        record: type_name::<T>(),
        detail: e.to_string(),
    })?;
    let Value::Object(fields) = serialized else {
        return Err(MapError::UnsupportedShape(type_name::<T>()));
    };

    let mut row = RowMap::new();
    for (field, value) in fields {
        row.insert(column_for::<T>(&field), SqlValue::from_json(value));
    }
    Ok(row)
}

/// Rebuild a record from a row map. Row values overlay the record's
/// default serialization field by field, then the whole object
/// deserializes in one shot; type coercion failures (overflow, malformed
/// temporal text) surface as [`MapError::Conversion`].
pub fn from_row<T: Entity>(row: &RowMap) -> Result<T, MapError> {
    let mut target = serde_json::to_value(T::default()).map_err(|e| MapError::Conversion {
        record: type_name::<T>(),
        detail: e.to_string(),
    })?;
    let Some(fields) = target.as_object_mut() else {
        return Err(MapError::InvalidTarget(type_name::<T>()));
    };

    for field in T::field_names() {
        let column = column_for::<T>(field);
        if let Some(value) = row.get(&column) {
            fields.insert((*field).to_string(), value.to_json());
        }
    }

    serde_json::from_value(target).map_err(|e| MapError::Conversion {
        record: type_name::<T>(),
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrors;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct TestUser {
        id: Option<i32>,
        name: String,
        email: String,
        is_active: bool,
    }

    impl Entity for TestUser {
        type Id = i32;

        fn id(&self) -> Option<i32> {
            self.id
        }

        fn set_id(&mut self, id: i32) {
            self.id = Some(id);
        }

        fn validate(&self) -> Result<(), ValidationErrors> {
            Ok(())
        }

        fn field_names() -> &'static [&'static str] {
            &["id", "name", "email", "is_active"]
        }

        fn column_overrides() -> &'static [(&'static str, &'static str)] {
            &[
                ("id", "user_id"),
                ("name", "user_name"),
                ("email", "email_address"),
            ]
        }
    }

    // Serializes to a bare number, not an object.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Scalar(i32);

    impl Entity for Scalar {
        type Id = i32;

        fn id(&self) -> Option<i32> {
            None
        }

        fn set_id(&mut self, _id: i32) {}

        fn validate(&self) -> Result<(), ValidationErrors> {
            Ok(())
        }

        fn field_names() -> &'static [&'static str] {
            &[]
        }
    }

    #[test]
    fn snake_case_derivation() {
        let cases = [
            ("ID", "id"),
            ("UserName", "user_name"),
            ("EmailAddress", "email_address"),
            ("HTMLParser", "html_parser"),
            ("already_snake", "already_snake"),
            ("TestABC123", "test_abc123"),
            ("", ""),
            ("Model3D", "model3_d"),
            ("userID", "user_id"),
        ];
        for (input, expected) in cases {
            assert_eq!(to_column_name(input), expected, "input: {input:?}");
        }
    }

    #[test]
    fn overrides_win_over_derivation() {
        assert_eq!(column_for::<TestUser>("email"), "email_address");
        assert_eq!(column_for::<TestUser>("is_active"), "is_active");
    }

    #[test]
    fn to_row_uses_column_names() {
        let user = TestUser {
            id: Some(1),
            name: "John".to_string(),
            email: "john@example.com".to_string(),
            is_active: true,
        };
        let row = to_row(&user).unwrap();
        assert_eq!(row.get("user_id"), Some(&SqlValue::Int(1)));
        assert_eq!(row.get("user_name"), Some(&SqlValue::Text("John".into())));
        assert_eq!(
            row.get("email_address"),
            Some(&SqlValue::Text("john@example.com".into()))
        );
        assert_eq!(row.get("is_active"), Some(&SqlValue::Bool(true)));
        assert_eq!(row.len(), 4);
    }

    #[test]
    fn to_row_maps_missing_id_to_null() {
        let user = TestUser::default();
        let row = to_row(&user).unwrap();
        assert_eq!(row.get("user_id"), Some(&SqlValue::Null));
    }

    #[test]
    fn to_row_rejects_non_record_shapes() {
        assert!(matches!(
            to_row(&Scalar(7)),
            Err(MapError::UnsupportedShape(_))
        ));
    }

    #[test]
    fn from_row_rejects_non_record_targets() {
        assert!(matches!(
            from_row::<Scalar>(&RowMap::new()),
            Err(MapError::InvalidTarget(_))
        ));
    }

    #[test]
    fn roundtrip_preserves_record() {
        let user = TestUser {
            id: Some(42),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            is_active: false,
        };
        let row = to_row(&user).unwrap();
        let back: TestUser = from_row(&row).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn missing_columns_keep_defaults() {
        let mut row = RowMap::new();
        row.insert("user_name".to_string(), SqlValue::Text("Bob".into()));
        let user: TestUser = from_row(&row).unwrap();
        assert_eq!(user.name, "Bob");
        assert_eq!(user.id, None);
        assert_eq!(user.email, "");
    }

    #[test]
    fn unknown_columns_are_ignored() {
        let mut row = RowMap::new();
        row.insert("user_name".to_string(), SqlValue::Text("Bob".into()));
        row.insert("no_such_column".to_string(), SqlValue::Int(9));
        assert!(from_row::<TestUser>(&row).is_ok());
    }

    #[test]
    fn wide_integers_narrow_when_in_range() {
        let mut row = RowMap::new();
        row.insert("user_id".to_string(), SqlValue::Int(7));
        let user: TestUser = from_row(&row).unwrap();
        assert_eq!(user.id, Some(7));
    }

    #[test]
    fn out_of_range_narrowing_is_an_error() {
        let mut row = RowMap::new();
        row.insert("user_id".to_string(), SqlValue::Int(i64::MAX));
        assert!(matches!(
            from_row::<TestUser>(&row),
            Err(MapError::Conversion { .. })
        ));
    }

    #[test]
    fn byte_columns_coerce_into_string_fields() {
        let mut row = RowMap::new();
        row.insert("user_name".to_string(), SqlValue::Bytes(b"John".to_vec()));
        let user: TestUser = from_row(&row).unwrap();
        assert_eq!(user.name, "John");
    }
}
