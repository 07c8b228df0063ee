//! Lesson record

use record_store::prelude::*;
use record_store::validation::rules;

/// A scheduled lesson: a teacher, a group (or an individual student), a
/// subject, and optionally a room.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub lesson_id: Option<i32>,
    pub audience_id: Option<i32>,
    pub employee_id: Option<i32>,
    pub group_id: Option<i32>,
    pub student_id: Option<i32>,
    pub subject_id: Option<i32>,
    pub lesson_name: String,
}

impl Entity for Lesson {
    type Id = i32;

    fn id(&self) -> Option<i32> {
        self.lesson_id
    }

    fn set_id(&mut self, id: i32) {
        self.lesson_id = Some(id);
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        rules::required(&mut errors, "employee_id", &self.employee_id);
        rules::required(&mut errors, "group_id", &self.group_id);
        rules::required(&mut errors, "subject_id", &self.subject_id);
        rules::required_str(&mut errors, "lesson_name", &self.lesson_name);
        rules::length(&mut errors, "lesson_name", &self.lesson_name, 1, 70);
        errors.into_result()
    }

    fn field_names() -> &'static [&'static str] {
        &[
            "lesson_id",
            "audience_id",
            "employee_id",
            "group_id",
            "student_id",
            "subject_id",
            "lesson_name",
        ]
    }
}

/// Repository bound to the `lesson` table.
pub fn lesson_repository(pool: PgPool) -> Result<Repository<Lesson>, StoreError> {
    Ok(Repository::new(pool, "lesson", "lesson_id")?
        .with_search_columns(&["lesson_name"])?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_length_is_bounded() {
        let lesson = Lesson {
            employee_id: Some(1),
            group_id: Some(2),
            subject_id: Some(3),
            lesson_name: "x".repeat(71),
            ..Lesson::default()
        };
        let errors = lesson.validate().unwrap_err();
        assert!(errors.message("lesson_name").is_some());
    }

    #[test]
    fn individual_lesson_without_group_fails() {
        let lesson = Lesson {
            employee_id: Some(1),
            student_id: Some(7),
            subject_id: Some(3),
            lesson_name: "Piano".to_string(),
            ..Lesson::default()
        };
        assert!(lesson.validate().is_err());
    }
}
