//! Convenience re-exports for common Gradus usage
//!
//! This prelude re-exports the items an application touching the data
//! layer usually needs, so one use statement covers the common case.
//!
//! # Example
//!
//! ```rust
//! use gradus::prelude::*;
//! ```

// Core Gradus components
pub use crate::core::Gradus;
pub use crate::errors::GradusError;

// Domain records and their repository constructors
pub use crate::domain::{
    assessment_repository, attendance_repository, lesson_repository, student_repository, Lesson,
    Student, StudentAssessment, StudentAttendance,
};

// Manager layer
pub use crate::managers::{
    AssessmentManager, AttendanceManager, AttendanceStats, BaseManager, StudentManager,
};

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, ManagerConfig};

// Re-export the engine's own prelude
pub use record_store::prelude::*;
pub use record_store;

// Common external dependencies
pub use async_trait;
pub use sqlx;
pub use tokio;

// Commonly used sqlx types
pub use sqlx::{Postgres, Transaction};
