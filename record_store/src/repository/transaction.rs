//! Transaction-scoped repositories
//!
//! [`TxRepository`] owns an open database transaction and exposes the same
//! operations as [`Repository`], all running on the transaction's single
//! connection. `commit` and `rollback` consume the scope, so a finished
//! transaction cannot be used again, by construction. A scope that is
//! dropped without either call rolls back; that is also what makes a
//! panicking transaction body safe.

use std::future::Future;
use std::time::Duration;

use sqlx::{Postgres, Transaction};

use crate::entity::Entity;
use crate::errors::StoreError;
use crate::filter::Filter;
use crate::repository::binding::TableBinding;
use crate::repository::Repository;

/// A repository scoped to one open transaction.
pub struct TxRepository<T: Entity> {
    tx: Transaction<'static, Postgres>,
    binding: TableBinding<T>,
}

impl<T: Entity> Repository<T> {
    /// Wrap an externally started transaction in this repository's table
    /// binding. The scope takes ownership; finish it with
    /// [`TxRepository::commit`] or [`TxRepository::rollback`].
    pub fn with_tx(&self, tx: Transaction<'static, Postgres>) -> TxRepository<T> {
        TxRepository {
            tx,
            binding: self.binding().clone(),
        }
    }

    /// Start a transaction on this repository's pool.
    pub async fn begin(&self) -> Result<TxRepository<T>, StoreError> {
        let tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| StoreError::from_sqlx("begin", self.table_name(), e))?;
        Ok(self.with_tx(tx))
    }

    /// Run `body` inside a transaction with a deadline.
    ///
    /// The body takes ownership of the transaction scope, does all of its
    /// database work through it, and hands the scope back alongside its
    /// result; reaching back to the ambient repository from inside the
    /// body would run those statements outside the transaction. Outcomes:
    ///
    /// - body returns `Ok` → commit; a failing commit is [`StoreError::Commit`]
    /// - body returns `Err` → the dropped scope rolls back, the body's
    ///   error comes through
    /// - the deadline elapses → the body's future is dropped, the scope
    ///   with it, and the result is [`StoreError::Timeout`]
    /// - body panics → the dropped scope rolls back, the panic propagates
    pub async fn execute_in_tx<R, F, Fut>(
        &self,
        timeout: Duration,
        body: F,
    ) -> Result<R, StoreError>
    where
        R: Send,
        F: FnOnce(TxRepository<T>) -> Fut + Send,
        Fut: Future<Output = Result<(TxRepository<T>, R), StoreError>> + Send,
    {
        let scope = self.begin().await?;

        match tokio::time::timeout(timeout, body(scope)).await {
            Ok(Ok((scope, value))) => {
                scope.commit().await?;
                Ok(value)
            }
            Ok(Err(err)) => Err(err),
            Err(_) => {
                tracing::error!(table = %self.table_name(), "transaction deadline elapsed");
                Err(StoreError::Timeout {
                    operation: "execute_in_tx",
                    table: self.table_name().to_string(),
                })
            }
        }
    }
}

impl<T: Entity> TxRepository<T> {
    pub fn table_name(&self) -> &str {
        self.binding.table_name()
    }

    pub async fn create(&mut self, record: &mut T) -> Result<(), StoreError> {
        self.binding.create(self.tx.as_mut(), record).await
    }

    pub async fn update(&mut self, record: &T) -> Result<u64, StoreError> {
        self.binding.update(self.tx.as_mut(), record).await
    }

    pub async fn delete(&mut self, id: &T::Id) -> Result<bool, StoreError> {
        self.binding.delete(self.tx.as_mut(), id).await
    }

    pub async fn get_by_id(&mut self, id: &T::Id) -> Result<Option<T>, StoreError> {
        self.binding.get_by_id(self.tx.as_mut(), id).await
    }

    pub async fn get_by_ids(&mut self, ids: &[T::Id]) -> Result<Vec<T>, StoreError> {
        self.binding.get_by_ids(self.tx.as_mut(), ids).await
    }

    pub async fn list(&mut self, filter: &Filter) -> Result<Vec<T>, StoreError> {
        self.binding.list(self.tx.as_mut(), filter).await
    }

    pub async fn count(&mut self, filter: &Filter) -> Result<i64, StoreError> {
        self.binding.count(self.tx.as_mut(), filter).await
    }

    pub async fn exists(&mut self, id: &T::Id) -> Result<bool, StoreError> {
        self.binding.exists(self.tx.as_mut(), id).await
    }

    /// Make the transaction's effects permanent. Consumes the scope.
    pub async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(StoreError::Commit)
    }

    /// Discard the transaction's effects. Consumes the scope.
    pub async fn rollback(self) -> Result<(), StoreError> {
        self.tx.rollback().await.map_err(StoreError::Rollback)
    }
}
