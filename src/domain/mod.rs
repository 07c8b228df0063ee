//! Domain records
//!
//! The core entities of the school: who studies, what is taught, who
//! showed up, and how they were graded. Each module defines the record,
//! its validation rules, and a constructor that binds it to its table.

mod assessment;
mod attendance;
mod lesson;
mod student;

pub use assessment::{assessment_repository, StudentAssessment};
pub use attendance::{attendance_repository, StudentAttendance};
pub use lesson::{lesson_repository, Lesson};
pub use student::{student_repository, Student};
