//! Student attendance record

use chrono::NaiveDate;
use record_store::prelude::*;
use record_store::validation::rules;

/// One attendance mark: a student at a lesson on a date, present or not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentAttendance {
    pub attendance_note_id: Option<i32>,
    pub student_id: Option<i32>,
    pub lesson_id: Option<i32>,
    pub presence_mark: bool,
    pub attendance_date: Option<NaiveDate>,
}

impl Entity for StudentAttendance {
    type Id = i32;

    fn id(&self) -> Option<i32> {
        self.attendance_note_id
    }

    fn set_id(&mut self, id: i32) {
        self.attendance_note_id = Some(id);
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        rules::required(&mut errors, "student_id", &self.student_id);
        rules::required(&mut errors, "lesson_id", &self.lesson_id);
        rules::required(&mut errors, "attendance_date", &self.attendance_date);
        rules::date_in_past(&mut errors, "attendance_date", self.attendance_date);
        errors.into_result()
    }

    fn field_names() -> &'static [&'static str] {
        &[
            "attendance_note_id",
            "student_id",
            "lesson_id",
            "presence_mark",
            "attendance_date",
        ]
    }
}

/// Repository bound to the `student_attendance` table.
pub fn attendance_repository(pool: PgPool) -> Result<Repository<StudentAttendance>, StoreError> {
    Ok(Repository::new(
        pool,
        "student_attendance",
        "attendance_note_id",
    )?)
}
