//! Application services layer - Use cases.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod user_service;

pub use user_service::{CreateUserInput, CreateUserOutput, UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
