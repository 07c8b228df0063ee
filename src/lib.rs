//! # Gradus
//!
//! Data-access framework for a music-school administration system:
//! a generic transactional CRUD engine over PostgreSQL with declarative
//! record validation and a per-entity manager layer.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gradus::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let gradus = Gradus::connect(&config).await?;
//!     gradus.health_check().await?;
//!
//!     let students = gradus.students()?;
//!
//!     let mut student = Student {
//!         surname: "Ivanova".to_string(),
//!         name: "Maria".to_string(),
//!         birthday: chrono::NaiveDate::from_ymd_opt(2010, 5, 14),
//!         group_id: Some(3),
//!         musprogramm_id: Some(1),
//!         ..Student::default()
//!     };
//!
//!     students.create(&mut student).await?;
//!     println!("created student #{:?}", student.student_id);
//!
//!     let group = students.by_group(3).await?;
//!     println!("{} students in group 3", group.len());
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod domain;
pub mod errors;
pub mod managers;
pub mod prelude;

// Re-export the main public types for convenience
pub use core::Gradus;
pub use errors::GradusError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, ManagerConfig};

// Re-export the storage engine
pub use record_store;

// Re-export external dependencies used in public API
pub use sqlx;
pub use async_trait;
