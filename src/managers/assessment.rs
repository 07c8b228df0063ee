//! Assessment manager

use std::ops::Deref;
use std::time::Duration;

use chrono::NaiveDate;
use record_store::{Filter, Repository, StoreError};
use sqlx::PgPool;

use crate::domain::{assessment_repository, StudentAssessment};
use crate::managers::base::BaseManager;

/// Business logic around grades.
pub struct AssessmentManager {
    base: BaseManager<Repository<StudentAssessment>>,
}

impl AssessmentManager {
    pub fn new(pool: PgPool, tx_timeout: Duration) -> Result<Self, StoreError> {
        Ok(Self {
            base: BaseManager::new(assessment_repository(pool)?, tx_timeout),
        })
    }

    /// All grades of one student, newest first.
    pub async fn by_student(&self, student_id: i32) -> Result<Vec<StudentAssessment>, StoreError> {
        self.base
            .list(
                &Filter::new()
                    .eq("student_id", student_id)
                    .order_by("assessment_date desc"),
            )
            .await
    }

    /// All grades given in one lesson, in student order.
    pub async fn by_lesson(&self, lesson_id: i32) -> Result<Vec<StudentAssessment>, StoreError> {
        self.base
            .list(
                &Filter::new()
                    .eq("lesson_id", lesson_id)
                    .order_by("student_id"),
            )
            .await
    }

    /// Grades within `[start, end]`, chronological.
    pub async fn by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<StudentAssessment>, StoreError> {
        self.base
            .list(
                &Filter::new()
                    .gte("assessment_date", start)
                    .lte("assessment_date", end)
                    .order_by("assessment_date, student_id"),
            )
            .await
    }

    /// Mean grade of one student; `None` when they have no grades yet.
    pub async fn average_grade(&self, student_id: i32) -> Result<Option<f64>, StoreError> {
        let assessments = self.by_student(student_id).await?;
        if assessments.is_empty() {
            return Ok(None);
        }
        let sum: i64 = assessments
            .iter()
            .filter_map(|a| a.grade)
            .map(i64::from)
            .sum();
        Ok(Some(sum as f64 / assessments.len() as f64))
    }

    /// Write a grade sheet atomically: existing notes update, new ones
    /// insert, the whole sheet commits or rolls back together.
    pub async fn bulk_upsert(&self, assessments: &mut [StudentAssessment]) -> Result<(), StoreError> {
        self.base.bulk_upsert(assessments).await
    }
}

impl Deref for AssessmentManager {
    type Target = BaseManager<Repository<StudentAssessment>>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}
