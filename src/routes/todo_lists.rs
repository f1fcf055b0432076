use std::sync::Arc;

use axum::{Router, extract::State, routing::get};
use chrono::{DateTime, FixedOffset};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};

use crate::{
    db::entities::todo_list,
    extract::{JsonBody, RecordId},
    middleware::AuthUser,
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
    validation::TodoListRequest,
};

const BASE_PATH: &str = "/todo-lists";

/// Body of create and update. Missing fields fall through to validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TodoListBody {
    pub title: String,
    pub description: Option<String>,
    #[serde(alias = "doing_at")]
    pub scheduled_at: Option<DateTime<FixedOffset>>,
}

impl TodoListBody {
    fn into_request(self, owner_id: i64) -> TodoListRequest {
        TodoListRequest {
            owner_id,
            title: self.title,
            description: self.description.unwrap_or_default(),
            scheduled_at: self.scheduled_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TodoListResponse {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub scheduled_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<todo_list::Model> for TodoListResponse {
    fn from(model: todo_list::Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            title: model.title,
            description: model.description,
            scheduled_at: model.scheduled_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(BASE_PATH, get(list_mine).post(create))
        .route(
            &format!("{BASE_PATH}/{{id}}"),
            get(get_by_id).put(update).delete(delete),
        )
        .with_state(state)
}

async fn get_by_id(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    RecordId(id): RecordId,
) -> ApiResult<TodoListResponse> {
    let service = ServiceContext::from_state(state.as_ref()).todo_lists();
    let list = service.get_by_id(&state.request_token(), id).await?;
    JsonApiResponse::ok(list.into())
}

async fn list_mine(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Vec<TodoListResponse>> {
    let service = ServiceContext::from_state(state.as_ref()).todo_lists();
    let lists = service
        .get_by_owner(&state.request_token(), user.owner_id)
        .await?;
    JsonApiResponse::ok(lists.into_iter().map(TodoListResponse::from).collect())
}

async fn create(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    JsonBody(body): JsonBody<TodoListBody>,
) -> ApiResult<TodoListResponse> {
    let service = ServiceContext::from_state(state.as_ref()).todo_lists();
    let request = body.into_request(user.owner_id);
    let list = service.create(&state.request_token(), &request).await?;
    JsonApiResponse::ok(list.into())
}

async fn update(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    RecordId(id): RecordId,
    JsonBody(body): JsonBody<TodoListBody>,
) -> ApiResult<Option<()>> {
    let service = ServiceContext::from_state(state.as_ref()).todo_lists();
    let request = body.into_request(user.owner_id);
    service
        .update_by_id(&state.request_token(), id, &request)
        .await?;
    JsonApiResponse::ok(None)
}

async fn delete(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    RecordId(id): RecordId,
) -> ApiResult<Option<()>> {
    let service = ServiceContext::from_state(state.as_ref()).todo_lists();
    service.delete_by_id(&state.request_token(), id).await?;
    JsonApiResponse::ok(None)
}
