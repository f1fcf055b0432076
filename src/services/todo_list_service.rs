use tokio_util::sync::CancellationToken;

use crate::{
    db::{
        dao::{DaoBase, TodoListDao},
        entities::todo_list,
        transaction::UpdateCoordinator,
    },
    services::error::ServiceResult,
    validation::{TodoListRequest, validate_payload},
};

#[derive(Clone)]
pub struct TodoListService {
    dao: TodoListDao,
    coordinator: UpdateCoordinator,
}

impl TodoListService {
    pub fn new(dao: TodoListDao, coordinator: UpdateCoordinator) -> Self {
        Self { dao, coordinator }
    }

    pub async fn get_by_id(
        &self,
        cancel: &CancellationToken,
        id: i64,
    ) -> ServiceResult<todo_list::Model> {
        Ok(self.dao.find_by_id(cancel, id).await?)
    }

    pub async fn get_by_owner(
        &self,
        cancel: &CancellationToken,
        owner_id: i64,
    ) -> ServiceResult<Vec<todo_list::Model>> {
        Ok(self.dao.find_by_owner(cancel, owner_id).await?)
    }

    /// Validates `request` before anything reaches the store.
    pub async fn create(
        &self,
        cancel: &CancellationToken,
        request: &TodoListRequest,
    ) -> ServiceResult<todo_list::Model> {
        validate_payload(request)?;
        Ok(self.dao.create_list(cancel, request.to_new()).await?)
    }

    /// Replaces title, description and schedule of list `id` under a row lock.
    ///
    /// `request.owner_id` is validated but never written.
    pub async fn update_by_id(
        &self,
        cancel: &CancellationToken,
        id: i64,
        request: &TodoListRequest,
    ) -> ServiceResult<todo_list::Model> {
        validate_payload(request)?;
        Ok(self
            .coordinator
            .apply_patch(cancel, id, request.to_patch())
            .await?)
    }

    pub async fn delete_by_id(&self, cancel: &CancellationToken, id: i64) -> ServiceResult<()> {
        Ok(self.dao.delete_by_id(cancel, id).await?)
    }
}
