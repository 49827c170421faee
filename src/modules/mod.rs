pub mod auth;
pub mod profiles;
pub mod users;

pub use self::users::model::{User, UserRole};
