//! Base manager: validation-gated CRUD
//!
//! A [`BaseManager`] wraps a store and enforces the write discipline every
//! domain manager shares: records validate before they touch the database,
//! guard checks run before SQL is issued, and failures are logged with
//! their context. Batch operations run inside one transaction with a
//! configured deadline, so a batch is all-or-nothing.

use std::time::Duration;

use record_store::{Entity, Filter, RecordStore, Repository, StoreError, ValidationErrors};

/// Shared business-logic layer over a [`RecordStore`].
///
/// Generic over the store so domain behavior can be tested against
/// in-memory doubles; production managers use `BaseManager<Repository<T>>`.
pub struct BaseManager<S: RecordStore> {
    store: S,
    tx_timeout: Duration,
}

impl<S: RecordStore> BaseManager<S> {
    pub fn new(store: S, tx_timeout: Duration) -> Self {
        Self { store, tx_timeout }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tx_timeout(&self) -> Duration {
        self.tx_timeout
    }

    /// Validate and persist a new record; its generated id is written back.
    pub async fn create(&self, record: &mut S::Record) -> Result<(), StoreError> {
        if let Err(errors) = record.validate() {
            tracing::error!(table = %self.store.table_name(), error = %errors, "create rejected by validation");
            return Err(errors.into());
        }
        self.store.create(record).await.map_err(|err| {
            tracing::error!(table = %self.store.table_name(), error = %err, "create failed");
            err
        })
    }

    /// Validate and overwrite an existing record. The record must carry an
    /// id. Returns the affected-row count; zero means no such row existed.
    pub async fn update(&self, record: &S::Record) -> Result<u64, StoreError> {
        if record.id().is_none() {
            return Err(StoreError::invalid_argument(
                "update",
                self.store.table_name(),
                "record id is required",
            ));
        }
        if let Err(errors) = record.validate() {
            tracing::error!(table = %self.store.table_name(), error = %errors, "update rejected by validation");
            return Err(errors.into());
        }
        self.store.update(record).await.map_err(|err| {
            tracing::error!(table = %self.store.table_name(), error = %err, "update failed");
            err
        })
    }

    pub async fn delete(&self, id: &<S::Record as Entity>::Id) -> Result<bool, StoreError> {
        self.store.delete(id).await.map_err(|err| {
            tracing::error!(table = %self.store.table_name(), error = %err, "delete failed");
            err
        })
    }

    pub async fn get_by_id(
        &self,
        id: &<S::Record as Entity>::Id,
    ) -> Result<Option<S::Record>, StoreError> {
        self.store.get_by_id(id).await
    }

    pub async fn get_by_ids(
        &self,
        ids: &[<S::Record as Entity>::Id],
    ) -> Result<Vec<S::Record>, StoreError> {
        self.store.get_by_ids(ids).await
    }

    pub async fn list(&self, filter: &Filter) -> Result<Vec<S::Record>, StoreError> {
        self.store.list(filter).await
    }

    pub async fn count(&self, filter: &Filter) -> Result<i64, StoreError> {
        self.store.count(filter).await
    }

    pub async fn exists(&self, id: &<S::Record as Entity>::Id) -> Result<bool, StoreError> {
        self.store.exists(id).await
    }

    /// Validate every record in a batch before any of them is written.
    /// Failures come back in one set, keyed `records[i].field`.
    pub fn validate_all(records: &[S::Record]) -> Result<(), ValidationErrors> {
        let mut all = ValidationErrors::new();
        for (i, record) in records.iter().enumerate() {
            if let Err(errors) = record.validate() {
                all.merge_prefixed(&format!("records[{i}]"), errors);
            }
        }
        all.into_result()
    }
}

/// Transactional batch operations; only available on database-backed
/// managers since they need a real transaction scope.
impl<T: Entity> BaseManager<Repository<T>> {
    /// Insert every record in one transaction. The whole batch is
    /// validated up front; if any record is invalid nothing is written.
    /// Generated ids are written back on success.
    pub async fn bulk_create(&self, records: &mut [T]) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }
        Self::validate_all(records)?;

        self.store
            .execute_in_tx(self.tx_timeout, |mut scope| async move {
                for record in records.iter_mut() {
                    scope.create(record).await?;
                }
                Ok((scope, ()))
            })
            .await
            .map_err(|err| {
                tracing::error!(table = %self.store.table_name(), error = %err, "bulk_create failed");
                err
            })
    }

    /// Create-or-update every record in one transaction: a record whose id
    /// exists in the table is updated, anything else is inserted. The
    /// batch validates up front and commits or rolls back as a unit.
    pub async fn bulk_upsert(&self, records: &mut [T]) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }
        Self::validate_all(records)?;

        self.store
            .execute_in_tx(self.tx_timeout, |mut scope| async move {
                for record in records.iter_mut() {
                    let existing = match record.id() {
                        Some(id) => scope.exists(&id).await?,
                        None => false,
                    };
                    if existing {
                        scope.update(record).await?;
                    } else {
                        scope.create(record).await?;
                    }
                }
                Ok((scope, ()))
            })
            .await
            .map_err(|err| {
                tracing::error!(table = %self.store.table_name(), error = %err, "bulk_upsert failed");
                err
            })
    }
}
