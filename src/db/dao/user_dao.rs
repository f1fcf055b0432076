use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tokio_util::sync::CancellationToken;

use super::{DaoBase, DaoResult, cancellable};
use crate::db::entities::{prelude::User, user};

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

impl DaoBase for UserDao {
    type Entity = User;
    const ENTITY_NAME: &'static str = "User";

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl UserDao {
    pub async fn find_by_email(
        &self,
        cancel: &CancellationToken,
        email: &str,
    ) -> DaoResult<Option<user::Model>> {
        let query = User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db);
        cancellable(cancel, query).await
    }

    pub async fn create_user(
        &self,
        cancel: &CancellationToken,
        email: &str,
        password_hash: &str,
    ) -> DaoResult<user::Model> {
        let model = user::ActiveModel {
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            ..Default::default()
        };
        self.create(cancel, model).await
    }
}
