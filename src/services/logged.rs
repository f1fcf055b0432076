use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::{
    db::entities::todo_list,
    services::{
        error::{ServiceError, ServiceResult},
        todo_list_service::TodoListService,
    },
    validation::TodoListRequest,
};

/// [`TodoListService`] with every failure logged before it is returned.
///
/// Errors pass through untouched; logging never changes what the caller sees.
#[derive(Clone)]
pub struct LoggedTodoListService {
    inner: TodoListService,
}

impl LoggedTodoListService {
    pub fn new(inner: TodoListService) -> Self {
        Self { inner }
    }

    pub async fn get_by_id(
        &self,
        cancel: &CancellationToken,
        id: i64,
    ) -> ServiceResult<todo_list::Model> {
        self.inner
            .get_by_id(cancel, id)
            .await
            .inspect_err(|err| log_failure("todo_lists.get_by_id", Some(id), None, None, err))
    }

    pub async fn get_by_owner(
        &self,
        cancel: &CancellationToken,
        owner_id: i64,
    ) -> ServiceResult<Vec<todo_list::Model>> {
        self.inner
            .get_by_owner(cancel, owner_id)
            .await
            .inspect_err(|err| {
                log_failure("todo_lists.get_by_owner", None, Some(owner_id), None, err)
            })
    }

    pub async fn create(
        &self,
        cancel: &CancellationToken,
        request: &TodoListRequest,
    ) -> ServiceResult<todo_list::Model> {
        self.inner.create(cancel, request).await.inspect_err(|err| {
            log_failure(
                "todo_lists.create",
                None,
                Some(request.owner_id),
                Some(request),
                err,
            )
        })
    }

    pub async fn update_by_id(
        &self,
        cancel: &CancellationToken,
        id: i64,
        request: &TodoListRequest,
    ) -> ServiceResult<todo_list::Model> {
        self.inner
            .update_by_id(cancel, id, request)
            .await
            .inspect_err(|err| {
                log_failure(
                    "todo_lists.update_by_id",
                    Some(id),
                    Some(request.owner_id),
                    Some(request),
                    err,
                )
            })
    }

    pub async fn delete_by_id(&self, cancel: &CancellationToken, id: i64) -> ServiceResult<()> {
        self.inner
            .delete_by_id(cancel, id)
            .await
            .inspect_err(|err| log_failure("todo_lists.delete_by_id", Some(id), None, None, err))
    }
}

fn log_failure(
    operation: &'static str,
    id: Option<i64>,
    owner_id: Option<i64>,
    payload: Option<&TodoListRequest>,
    err: &ServiceError,
) {
    let payload = payload
        .and_then(|request| serde_json::to_string(request).ok())
        .unwrap_or_default();

    if err.is_client_error() {
        warn!(operation, ?id, ?owner_id, %payload, error = %err, "todo list operation rejected");
    } else {
        error!(operation, ?id, ?owner_id, %payload, error = %err, "todo list operation failed");
    }
}
