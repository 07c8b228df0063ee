//! The object-safe store contract
//!
//! [`RecordStore`] abstracts "something that persists records of one
//! type". The manager layer is written against it, which is what lets
//! manager behavior be tested with in-memory stores, and it is the bound
//! the coordinator's store registry requires.

use async_trait::async_trait;

use crate::entity::Entity;
use crate::errors::StoreError;
use crate::filter::Filter;
use crate::repository::Repository;

#[async_trait]
pub trait RecordStore: Send + Sync {
    type Record: Entity;

    /// Backing table name, for error context.
    fn table_name(&self) -> &str;

    /// Persist a new record and write its generated id back.
    async fn create(&self, record: &mut Self::Record) -> Result<(), StoreError>;

    /// Overwrite the stored row for this record's id; returns affected rows.
    async fn update(&self, record: &Self::Record) -> Result<u64, StoreError>;

    async fn delete(&self, id: &<Self::Record as Entity>::Id) -> Result<bool, StoreError>;

    async fn get_by_id(
        &self,
        id: &<Self::Record as Entity>::Id,
    ) -> Result<Option<Self::Record>, StoreError>;

    async fn get_by_ids(
        &self,
        ids: &[<Self::Record as Entity>::Id],
    ) -> Result<Vec<Self::Record>, StoreError>;

    async fn list(&self, filter: &Filter) -> Result<Vec<Self::Record>, StoreError>;

    async fn count(&self, filter: &Filter) -> Result<i64, StoreError>;

    async fn exists(&self, id: &<Self::Record as Entity>::Id) -> Result<bool, StoreError>;
}

#[async_trait]
impl<T: Entity> RecordStore for Repository<T> {
    type Record = T;

    fn table_name(&self) -> &str {
        Repository::table_name(self)
    }

    async fn create(&self, record: &mut T) -> Result<(), StoreError> {
        Repository::create(self, record).await
    }

    async fn update(&self, record: &T) -> Result<u64, StoreError> {
        Repository::update(self, record).await
    }

    async fn delete(&self, id: &T::Id) -> Result<bool, StoreError> {
        Repository::delete(self, id).await
    }

    async fn get_by_id(&self, id: &T::Id) -> Result<Option<T>, StoreError> {
        Repository::get_by_id(self, id).await
    }

    async fn get_by_ids(&self, ids: &[T::Id]) -> Result<Vec<T>, StoreError> {
        Repository::get_by_ids(self, ids).await
    }

    async fn list(&self, filter: &Filter) -> Result<Vec<T>, StoreError> {
        Repository::list(self, filter).await
    }

    async fn count(&self, filter: &Filter) -> Result<i64, StoreError> {
        Repository::count(self, filter).await
    }

    async fn exists(&self, id: &T::Id) -> Result<bool, StoreError> {
        Repository::exists(self, id).await
    }
}
