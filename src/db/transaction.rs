//! Lock → mutate → commit for a single todo list row.
//!
//! [`UpdateCoordinator`] opens one transaction per call and owns it until it is
//! committed or rolled back. Every early return rolls back explicitly; if the calling
//! future is dropped instead (client disconnect, panic), dropping the
//! `DatabaseTransaction` rolls it back.

use std::time::Duration;

use futures_util::future::BoxFuture;
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, DatabaseTransaction,
    SqliteTransactionMode, TransactionOptions, TransactionTrait,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::db::{
    dao::{DaoBase, DaoLayerError, DaoResult, TodoListDao, TodoListPatch, cancellable},
    entities::todo_list,
};

/// Where an update transaction ended up. Logged on every exit path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePhase {
    Begin,
    Locked,
    Mutated,
    Committed,
    RolledBack,
    Aborted,
}

#[derive(Clone)]
pub struct UpdateCoordinator {
    db: DatabaseConnection,
    dao: TodoListDao,
    lock_timeout: Option<Duration>,
}

impl UpdateCoordinator {
    pub fn new(db: &DatabaseConnection, lock_timeout: Option<Duration>) -> Self {
        Self {
            db: db.clone(),
            dao: TodoListDao::new(db),
            lock_timeout,
        }
    }

    /// Replaces the mutable fields of list `id` under a row lock.
    pub async fn apply_patch(
        &self,
        cancel: &CancellationToken,
        id: i64,
        patch: TodoListPatch,
    ) -> DaoResult<todo_list::Model> {
        let dao = self.dao.clone();
        let inner_cancel = cancel.clone();
        self.update_by_id(cancel, id, move |txn, locked| {
            Box::pin(async move { dao.update_locked(&inner_cancel, txn, locked, patch).await })
        })
        .await
    }

    /// Runs `mutate` against the locked row inside one transaction.
    ///
    /// `mutate` receives the transaction and the row as it was when the lock was taken.
    /// The transaction commits only if locking and `mutate` both succeed and `cancel`
    /// has not fired; once the commit is issued it is not interrupted.
    pub async fn update_by_id<F>(
        &self,
        cancel: &CancellationToken,
        id: i64,
        mutate: F,
    ) -> DaoResult<todo_list::Model>
    where
        F: for<'t> FnOnce(
                &'t DatabaseTransaction,
                todo_list::Model,
            ) -> BoxFuture<'t, DaoResult<todo_list::Model>>
            + Send,
    {
        let txn = cancellable(cancel, self.db.begin_with_options(begin_options())).await?;
        debug!(id, phase = ?UpdatePhase::Begin, "update transaction opened");

        if let Err(err) = self.apply_lock_timeout(cancel, &txn).await {
            return Err(release(txn, id, UpdatePhase::Aborted, err).await);
        }

        let locked = self.dao.lock_for_update(cancel, &txn, id).await;
        let locked = match locked {
            Ok(model) => model,
            Err(err) => return Err(release(txn, id, UpdatePhase::Aborted, err).await),
        };
        debug!(id, phase = ?UpdatePhase::Locked, "row locked");

        let mutated = cancellable(cancel, mutate(&txn, locked)).await;
        let mutated = match mutated {
            Ok(model) => model,
            Err(err) => return Err(release(txn, id, UpdatePhase::RolledBack, err).await),
        };
        debug!(id, phase = ?UpdatePhase::Mutated, "row mutated");

        if cancel.is_cancelled() {
            return Err(release(txn, id, UpdatePhase::RolledBack, DaoLayerError::Cancelled).await);
        }

        txn.commit().await?;
        debug!(id, phase = ?UpdatePhase::Committed, "update transaction committed");
        Ok(mutated)
    }

    async fn apply_lock_timeout(
        &self,
        cancel: &CancellationToken,
        txn: &DatabaseTransaction,
    ) -> DaoResult<()> {
        let Some(timeout) = self.lock_timeout else {
            return Ok(());
        };
        // SQLite waits on its busy timeout, configured per connection by sqlx.
        if txn.get_database_backend() != DatabaseBackend::Postgres {
            return Ok(());
        }

        let statement = format!("SET LOCAL lock_timeout = '{}ms'", timeout.as_millis());
        cancellable(cancel, txn.execute_unprepared(&statement)).await?;
        Ok(())
    }
}

/// SQLite ignores `FOR UPDATE`, so the write lock is taken at `BEGIN`. A deferred
/// transaction would hold a read lock and fail with `SQLITE_BUSY` on upgrade instead of
/// waiting out the busy timeout.
fn begin_options() -> TransactionOptions {
    TransactionOptions {
        sqlite_transaction_mode: Some(SqliteTransactionMode::Immediate),
        ..Default::default()
    }
}

async fn release(
    txn: DatabaseTransaction,
    id: i64,
    phase: UpdatePhase,
    err: DaoLayerError,
) -> DaoLayerError {
    if let Err(rollback_err) = txn.rollback().await {
        warn!(id, ?phase, error = %rollback_err, "rollback failed");
    }
    debug!(id, ?phase, error = %err, "update transaction released");
    err
}
