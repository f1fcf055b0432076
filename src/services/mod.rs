pub mod auth_service;
pub mod context;
pub mod error;
pub mod logged;
pub mod todo_list_service;

pub use context::ServiceContext;
pub use error::{ServiceError, ServiceResult};
pub use logged::LoggedTodoListService;
pub use todo_list_service::TodoListService;
