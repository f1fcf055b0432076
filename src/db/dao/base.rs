use chrono::{SubsecRound, Utc};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    IntoActiveModel, PrimaryKeyTrait, entity::prelude::DateTimeWithTimeZone,
};
use tokio_util::sync::CancellationToken;

use super::base_traits::TimestampedActiveModel;
use super::cancel::cancellable;
use super::error::{DaoLayerError, DaoResult};

/// Current time truncated to the microsecond precision every backend stores.
pub fn db_now() -> DateTimeWithTimeZone {
    Utc::now().fixed_offset().trunc_subsecs(6)
}

#[async_trait::async_trait]
pub trait DaoBase: Clone + Send + Sync + Sized
where
    <Self::Entity as EntityTrait>::Model:
        FromQueryResult + IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send + Sync,
    <Self::Entity as EntityTrait>::ActiveModel: ActiveModelTrait<Entity = Self::Entity>
        + ActiveModelBehavior
        + TimestampedActiveModel
        + Send,
    <<Self::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType:
        From<i64> + Send + Sync,
{
    type Entity: EntityTrait + Send + Sync;
    /// Human readable name used in not-found errors.
    const ENTITY_NAME: &'static str;

    fn from_db(db: DatabaseConnection) -> Self;

    fn new(db: &DatabaseConnection) -> Self {
        Self::from_db(db.clone())
    }

    fn db(&self) -> &DatabaseConnection;

    /// Inserts a row; the database assigns the id and the store stamps both timestamps.
    async fn create(
        &self,
        cancel: &CancellationToken,
        data: impl IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send,
    ) -> DaoResult<<Self::Entity as EntityTrait>::Model> {
        let now = db_now();
        let mut active = data.into_active_model();
        active.set_created_at(now);
        active.set_updated_at(now);
        cancellable(cancel, active.insert(self.db())).await
    }

    async fn find_by_id(
        &self,
        cancel: &CancellationToken,
        id: i64,
    ) -> DaoResult<<Self::Entity as EntityTrait>::Model> {
        let model = cancellable(cancel, Self::Entity::find_by_id(id).one(self.db())).await?;

        model.ok_or(DaoLayerError::NotFound {
            entity: Self::ENTITY_NAME,
            id,
        })
    }

    async fn delete(&self, cancel: &CancellationToken, id: i64) -> DaoResult<i64> {
        let result = cancellable(cancel, Self::Entity::delete_by_id(id).exec(self.db())).await?;

        if result.rows_affected == 0 {
            return Err(DaoLayerError::NotFound {
                entity: Self::ENTITY_NAME,
                id,
            });
        }

        Ok(id)
    }
}
