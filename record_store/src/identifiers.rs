//! Lexical validation for SQL identifiers
//!
//! Table and column names are interpolated into statements (they cannot be
//! bound as parameters), so every identifier that reaches a query string
//! must first pass through [`ValidatedTableName`] or [`ValidatedColumnName`].
//! Validation is purely lexical; existence checks are left to the database.

use std::fmt;
use thiserror::Error;

/// PostgreSQL truncates identifiers beyond this length, which would make a
/// validated name and the name the server actually uses silently diverge.
const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Keywords that would change the meaning of a statement if they appeared
/// bare in an identifier position.
const RESERVED_KEYWORDS: &[&str] = &[
    "all", "alter", "and", "any", "as", "asc", "between", "by", "case", "cast", "check", "column",
    "constraint", "create", "cross", "current_date", "current_time", "current_timestamp",
    "current_user", "default", "delete", "desc", "distinct", "drop", "else", "end", "except",
    "exists", "foreign", "from", "full", "grant", "group", "having", "in", "inner", "insert",
    "intersect", "into", "is", "join", "left", "like", "limit", "not", "null", "offset", "on",
    "or", "order", "outer", "primary", "references", "revoke", "right", "select", "session_user",
    "set", "table", "then", "to", "union", "unique", "update", "user", "using", "values", "when",
    "where", "with",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("identifier cannot be empty")]
    Empty,

    #[error("identifier '{name}' is {length} characters long (maximum {MAX_IDENTIFIER_LENGTH})")]
    TooLong { name: String, length: usize },

    #[error("identifier '{0}' must start with a letter or underscore")]
    InvalidStart(String),

    #[error("identifier '{0}' may only contain letters, digits, and underscores")]
    InvalidCharacters(String),

    #[error("identifier '{0}' is a reserved SQL keyword")]
    ReservedKeyword(String),

    #[error("invalid ORDER BY segment '{0}'")]
    InvalidOrdering(String),
}

fn validate_identifier(name: &str) -> Result<(), IdentifierError> {
    if name.is_empty() {
        return Err(IdentifierError::Empty);
    }
    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(IdentifierError::TooLong {
            name: name.to_string(),
            length: name.len(),
        });
    }

    let mut chars = name.chars();
    // name is non-empty, checked above
    if let Some(first) = chars.next() {
        if !first.is_ascii_alphabetic() && first != '_' {
            return Err(IdentifierError::InvalidStart(name.to_string()));
        }
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(IdentifierError::InvalidCharacters(name.to_string()));
    }

    if RESERVED_KEYWORDS.contains(&name.to_ascii_lowercase().as_str()) {
        return Err(IdentifierError::ReservedKeyword(name.to_string()));
    }
    Ok(())
}

/// A table name proven safe for interpolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTableName(String);

impl ValidatedTableName {
    pub fn new(name: &str) -> Result<Self, IdentifierError> {
        validate_identifier(name)?;
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidatedTableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A column name proven safe for interpolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedColumnName(String);

impl ValidatedColumnName {
    pub fn new(name: &str) -> Result<Self, IdentifierError> {
        validate_identifier(name)?;
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidatedColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate a raw ORDER BY expression of the form
/// `column [asc|desc], column [asc|desc], ...` and return its normalized
/// SQL rendering.
pub fn validate_order_by(raw: &str) -> Result<String, IdentifierError> {
    let mut rendered = Vec::new();
    for segment in raw.split(',') {
        let segment = segment.trim();
        let mut tokens = segment.split_whitespace();
        let column = match tokens.next() {
            Some(column) => ValidatedColumnName::new(column)?,
            None => return Err(IdentifierError::InvalidOrdering(segment.to_string())),
        };
        let direction = match tokens.next() {
            None => "ASC",
            Some(dir) if dir.eq_ignore_ascii_case("asc") => "ASC",
            Some(dir) if dir.eq_ignore_ascii_case("desc") => "DESC",
            Some(_) => return Err(IdentifierError::InvalidOrdering(segment.to_string())),
        };
        if tokens.next().is_some() {
            return Err(IdentifierError::InvalidOrdering(segment.to_string()));
        }
        rendered.push(format!("{} {}", column, direction));
    }
    Ok(rendered.join(", "))
}
