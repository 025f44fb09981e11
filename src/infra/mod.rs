//! Infrastructure layer - External systems integration
//!
//! Adapters behind the use case's collaborator traits:
//! - Postgres persistence (SeaORM) and migrations
//! - Object storage URL building

pub mod db;
pub mod repositories;
pub mod storage;

pub use db::{Database, MigrationStatus, Migrator};
pub use repositories::{UserRepository, UserStore};
pub use storage::{ObjectStorage, PublicUrlStorage};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockUserRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use storage::MockObjectStorage;
