//! Manager layer
//!
//! Managers are the only write path the application is supposed to use:
//! they validate records before touching the database and bundle the
//! domain queries each entity needs. All of them sit on
//! [`base::BaseManager`]; repository access without a manager is reserved
//! for read-only plumbing.

pub mod assessment;
pub mod attendance;
pub mod base;
pub mod student;

pub use assessment::AssessmentManager;
pub use attendance::{AttendanceManager, AttendanceStats};
pub use base::BaseManager;
pub use student::StudentManager;
