use chrono::Duration;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set,
    entity::prelude::DateTimeWithTimeZone,
};
use tokio_util::sync::CancellationToken;

use super::{DaoBase, DaoLayerError, DaoResult, cancellable, db_now};
use crate::db::entities::prelude::TodoList;
use crate::db::entities::todo_list;

/// Fields supplied by the owner when a list is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodoList {
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub scheduled_at: Option<DateTimeWithTimeZone>,
}

/// Full replacement of the mutable fields. The owner is never part of a patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListPatch {
    pub title: String,
    pub description: String,
    pub scheduled_at: Option<DateTimeWithTimeZone>,
}

#[derive(Clone)]
pub struct TodoListDao {
    db: DatabaseConnection,
}

impl DaoBase for TodoListDao {
    type Entity = TodoList;
    const ENTITY_NAME: &'static str = "Todo list";

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl TodoListDao {
    pub async fn create_list(
        &self,
        cancel: &CancellationToken,
        new: NewTodoList,
    ) -> DaoResult<todo_list::Model> {
        let model = todo_list::ActiveModel {
            owner_id: Set(new.owner_id),
            title: Set(new.title),
            description: Set(new.description),
            scheduled_at: Set(new.scheduled_at),
            ..Default::default()
        };
        self.create(cancel, model).await
    }

    /// Every list of `owner_id`, oldest id first.
    pub async fn find_by_owner(
        &self,
        cancel: &CancellationToken,
        owner_id: i64,
    ) -> DaoResult<Vec<todo_list::Model>> {
        let query = TodoList::find()
            .filter(todo_list::Column::OwnerId.eq(owner_id))
            .order_by_asc(todo_list::Column::Id)
            .all(&self.db);
        cancellable(cancel, query).await
    }

    /// Reads the row with `SELECT ... FOR UPDATE` inside `txn`.
    ///
    /// The lock is held until `txn` commits or rolls back, so a second caller on the
    /// same id waits here. SQLite has no row locks; callers there must open `txn` with
    /// `BEGIN IMMEDIATE` so writers queue on the database lock.
    pub async fn lock_for_update(
        &self,
        cancel: &CancellationToken,
        txn: &DatabaseTransaction,
        id: i64,
    ) -> DaoResult<todo_list::Model> {
        let query = TodoList::find_by_id(id).lock_exclusive().one(txn);
        cancellable(cancel, query)
            .await?
            .ok_or(DaoLayerError::NotFound {
                entity: Self::ENTITY_NAME,
                id,
            })
    }

    /// Writes `patch` over a row previously returned by [`Self::lock_for_update`] on the
    /// same transaction.
    pub async fn update_locked(
        &self,
        cancel: &CancellationToken,
        txn: &DatabaseTransaction,
        locked: todo_list::Model,
        patch: TodoListPatch,
    ) -> DaoResult<todo_list::Model> {
        let updated_at = next_updated_at(locked.updated_at);
        let mut active = locked.into_active_model();
        active.title = Set(patch.title);
        active.description = Set(patch.description);
        active.scheduled_at = Set(patch.scheduled_at);
        active.updated_at = Set(updated_at);
        cancellable(cancel, active.update(txn)).await
    }

    pub async fn delete_by_id(&self, cancel: &CancellationToken, id: i64) -> DaoResult<()> {
        self.delete(cancel, id).await.map(|_| ())
    }
}

/// `updated_at` must move forward even when the clock has not ticked since the
/// previous write.
fn next_updated_at(previous: DateTimeWithTimeZone) -> DateTimeWithTimeZone {
    let now = db_now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
