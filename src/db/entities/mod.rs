#[allow(unused_imports)]
pub mod prelude {
    pub use super::todo_list::Entity as TodoList;
    pub use super::user::Entity as User;
}

pub mod todo_list;
pub mod user;
