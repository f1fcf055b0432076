mod error;
pub mod jwt;
pub mod password;
mod types;

pub use error::AuthError;
pub use jwt::JwtKeys;
pub use types::{Claims, TokenBundle};
