//! Error types for the Gradus crate
//!
//! This module contains the errors returned by the coordinator; store and
//! manager operations return [`record_store::StoreError`] directly.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GradusError {
    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] record_store::StoreError),
}
