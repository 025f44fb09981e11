//! Repository layer - Data access abstraction
//!
//! The use case only sees the `UserRepository` trait; `UserStore` is the
//! SeaORM implementation wired in by the serve command.

pub(crate) mod entities;
mod user_repository;

pub use user_repository::{UserRepository, UserStore};

// Export mock for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
