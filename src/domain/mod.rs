//! Domain layer - Core business entities and logic
//!
//! Entities and value objects of the registration workflow. Nothing here
//! knows about HTTP or the database.

pub mod id;
pub mod password;
pub mod user;

pub use id::{Id, IdError};
pub use password::Password;
pub use user::{is_valid_email, User, UserError, UserType};
