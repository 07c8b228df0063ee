//! Student record

use chrono::NaiveDate;
use record_store::prelude::*;
use record_store::validation::rules;

/// A student enrolled in the school.
///
/// `student_id` is `None` until the record is persisted. Optional fields
/// map to nullable columns; required-but-generated values stay `Option`
/// so an unsaved record is representable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub student_id: Option<i32>,
    pub user_id: Option<i32>,
    pub surname: String,
    pub name: String,
    pub father_name: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub group_id: Option<i32>,
    pub musprogramm_id: Option<i32>,
}

impl Entity for Student {
    type Id = i32;

    fn id(&self) -> Option<i32> {
        self.student_id
    }

    fn set_id(&mut self, id: i32) {
        self.student_id = Some(id);
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        rules::required_str(&mut errors, "surname", &self.surname);
        rules::length(&mut errors, "surname", &self.surname, 1, 60);
        rules::required_str(&mut errors, "name", &self.name);
        rules::length(&mut errors, "name", &self.name, 1, 45);
        if let Some(father_name) = &self.father_name {
            rules::length(&mut errors, "father_name", father_name, 0, 55);
        }
        rules::required(&mut errors, "birthday", &self.birthday);
        rules::date_in_past(&mut errors, "birthday", self.birthday);
        if let Some(phone) = &self.phone_number {
            rules::exact_digits(&mut errors, "phone_number", phone, 11);
        }
        rules::required(&mut errors, "group_id", &self.group_id);
        rules::required(&mut errors, "musprogramm_id", &self.musprogramm_id);
        errors.into_result()
    }

    fn field_names() -> &'static [&'static str] {
        &[
            "student_id",
            "user_id",
            "surname",
            "name",
            "father_name",
            "birthday",
            "phone_number",
            "group_id",
            "musprogramm_id",
        ]
    }
}

/// Repository bound to the `student` table. Free-text search covers the
/// name columns.
pub fn student_repository(pool: PgPool) -> Result<Repository<Student>, StoreError> {
    Ok(Repository::new(pool, "student", "student_id")?
        .with_search_columns(&["surname", "name", "father_name"])?)
}
