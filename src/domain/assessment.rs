//! Student assessment record

use chrono::NaiveDate;
use record_store::prelude::*;
use record_store::validation::rules;

/// A grade a student received for a piece of work in a lesson.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentAssessment {
    pub assessment_note_id: Option<i32>,
    pub lesson_id: Option<i32>,
    pub student_id: Option<i32>,
    pub task_type: String,
    pub grade: Option<i32>,
    pub assessment_date: Option<NaiveDate>,
}

impl Entity for StudentAssessment {
    type Id = i32;

    fn id(&self) -> Option<i32> {
        self.assessment_note_id
    }

    fn set_id(&mut self, id: i32) {
        self.assessment_note_id = Some(id);
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        rules::required(&mut errors, "lesson_id", &self.lesson_id);
        rules::required(&mut errors, "student_id", &self.student_id);
        rules::required_str(&mut errors, "task_type", &self.task_type);
        rules::length(&mut errors, "task_type", &self.task_type, 1, 70);
        match self.grade {
            Some(grade) => rules::range(&mut errors, "grade", grade, 0, 100),
            None => errors.add("grade", "is required"),
        }
        rules::required(&mut errors, "assessment_date", &self.assessment_date);
        errors.into_result()
    }

    fn field_names() -> &'static [&'static str] {
        &[
            "assessment_note_id",
            "lesson_id",
            "student_id",
            "task_type",
            "grade",
            "assessment_date",
        ]
    }
}

/// Repository bound to the `student_assessment` table.
pub fn assessment_repository(pool: PgPool) -> Result<Repository<StudentAssessment>, StoreError> {
    Ok(Repository::new(
        pool,
        "student_assessment",
        "assessment_note_id",
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_assessment() -> StudentAssessment {
        StudentAssessment {
            assessment_note_id: None,
            lesson_id: Some(4),
            student_id: Some(9),
            task_type: "Exam".to_string(),
            grade: Some(85),
            assessment_date: NaiveDate::from_ymd_opt(2024, 12, 20),
        }
    }

    #[test]
    fn valid_assessment_passes() {
        assert!(valid_assessment().validate().is_ok());
    }

    #[test]
    fn grade_out_of_range_fails() {
        let mut assessment = valid_assessment();
        assessment.grade = Some(101);
        let errors = assessment.validate().unwrap_err();
        assert!(errors.message("grade").is_some());
    }

    #[test]
    fn missing_grade_fails() {
        let mut assessment = valid_assessment();
        assessment.grade = None;
        assert!(assessment.validate().is_err());
    }
}
