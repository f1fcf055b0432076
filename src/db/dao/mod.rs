pub mod base;
pub mod base_traits;
mod cancel;
mod context;
pub mod error;
pub mod todo_list_dao;
pub mod user_dao;

pub use base::{DaoBase, db_now};
pub use base_traits::TimestampedActiveModel;
pub use cancel::cancellable;
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use todo_list_dao::{NewTodoList, TodoListDao, TodoListPatch};
pub use user_dao::UserDao;
