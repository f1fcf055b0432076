use std::time::Duration;

use crate::{
    auth::JwtKeys,
    db::{dao::DaoContext, transaction::UpdateCoordinator},
    services::{
        auth_service::AuthService, logged::LoggedTodoListService,
        todo_list_service::TodoListService,
    },
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
    jwt: JwtKeys,
    access_ttl_secs: usize,
    lock_timeout: Option<Duration>,
}

impl ServiceContext {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            daos: DaoContext::new(&state.db),
            jwt: state.jwt.clone(),
            access_ttl_secs: state.auth.access_ttl_secs,
            lock_timeout: state.config.database.lock_timeout(),
        }
    }

    pub fn todo_lists(&self) -> LoggedTodoListService {
        let coordinator = UpdateCoordinator::new(self.daos.db(), self.lock_timeout);
        LoggedTodoListService::new(TodoListService::new(self.daos.todo_list(), coordinator))
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.daos.user(), self.jwt.clone(), self.access_ttl_secs)
    }
}
