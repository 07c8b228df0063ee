//! Attendance manager

use std::ops::Deref;
use std::time::Duration;

use chrono::NaiveDate;
use record_store::{Filter, Repository, StoreError};
use sqlx::PgPool;

use crate::domain::{attendance_repository, StudentAttendance};
use crate::managers::base::BaseManager;

/// Per-student present/absent totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceStats {
    pub present: i64,
    pub absent: i64,
}

/// Business logic around attendance marks.
pub struct AttendanceManager {
    base: BaseManager<Repository<StudentAttendance>>,
}

impl AttendanceManager {
    pub fn new(pool: PgPool, tx_timeout: Duration) -> Result<Self, StoreError> {
        Ok(Self {
            base: BaseManager::new(attendance_repository(pool)?, tx_timeout),
        })
    }

    /// All marks for one student, newest first.
    pub async fn by_student(&self, student_id: i32) -> Result<Vec<StudentAttendance>, StoreError> {
        self.base
            .list(
                &Filter::new()
                    .eq("student_id", student_id)
                    .order_by("attendance_date desc"),
            )
            .await
    }

    /// All marks for one lesson, in student order.
    pub async fn by_lesson(&self, lesson_id: i32) -> Result<Vec<StudentAttendance>, StoreError> {
        self.base
            .list(
                &Filter::new()
                    .eq("lesson_id", lesson_id)
                    .order_by("student_id"),
            )
            .await
    }

    /// Marks within `[start, end]`, chronological.
    pub async fn by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<StudentAttendance>, StoreError> {
        self.base
            .list(
                &Filter::new()
                    .gte("attendance_date", start)
                    .lte("attendance_date", end)
                    .order_by("attendance_date, student_id"),
            )
            .await
    }

    /// Present/absent totals for one student, counted server-side.
    pub async fn attendance_stats(&self, student_id: i32) -> Result<AttendanceStats, StoreError> {
        let present = self
            .base
            .count(
                &Filter::new()
                    .eq("student_id", student_id)
                    .eq("presence_mark", true),
            )
            .await?;
        let absent = self
            .base
            .count(
                &Filter::new()
                    .eq("student_id", student_id)
                    .eq("presence_mark", false),
            )
            .await?;
        Ok(AttendanceStats { present, absent })
    }

    /// Is there already a mark for this student in this lesson?
    pub async fn check_duplicate(&self, student_id: i32, lesson_id: i32) -> Result<bool, StoreError> {
        let matches = self
            .base
            .count(
                &Filter::new()
                    .eq("student_id", student_id)
                    .eq("lesson_id", lesson_id),
            )
            .await?;
        Ok(matches > 0)
    }

    /// Record a whole class's marks atomically.
    pub async fn bulk_create(&self, marks: &mut [StudentAttendance]) -> Result<(), StoreError> {
        self.base.bulk_create(marks).await
    }
}

impl Deref for AttendanceManager {
    type Target = BaseManager<Repository<StudentAttendance>>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}
