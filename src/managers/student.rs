//! Student manager

use std::ops::Deref;
use std::time::Duration;

use record_store::{Filter, Repository, StoreError};
use sqlx::PgPool;

use crate::domain::{student_repository, Student};
use crate::managers::base::BaseManager;

/// Business logic around students. Derefs to [`BaseManager`] for the
/// shared CRUD surface.
pub struct StudentManager {
    base: BaseManager<Repository<Student>>,
}

impl StudentManager {
    pub fn new(pool: PgPool, tx_timeout: Duration) -> Result<Self, StoreError> {
        Ok(Self {
            base: BaseManager::new(student_repository(pool)?, tx_timeout),
        })
    }

    /// Students of one study group, ordered for class lists.
    pub async fn by_group(&self, group_id: i32) -> Result<Vec<Student>, StoreError> {
        self.base
            .list(
                &Filter::new()
                    .eq("group_id", group_id)
                    .order_by("surname, name"),
            )
            .await
    }

    /// Free-text search across the name columns.
    pub async fn search_by_name(&self, query: &str, limit: i64) -> Result<Vec<Student>, StoreError> {
        self.base
            .list(
                &Filter::new()
                    .search(query)
                    .order_by("surname, name")
                    .limit(limit),
            )
            .await
    }

    /// Students following a given program.
    pub async fn by_program(&self, musprogramm_id: i32) -> Result<Vec<Student>, StoreError> {
        self.base
            .list(
                &Filter::new()
                    .eq("musprogramm_id", musprogramm_id)
                    .order_by("surname, name"),
            )
            .await
    }
}

impl Deref for StudentManager {
    type Target = BaseManager<Repository<Student>>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}
