//! User repository: persistence contract and its Postgres implementation.

use std::future::Future;

use async_trait::async_trait;
use sea_orm::{sqlx, ActiveModelTrait, DatabaseConnection, DbErr, RuntimeErr};
use tokio::time::{timeout_at, Instant};

use super::entities::UserActiveModel;
use crate::domain::User;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Persistence contract for users.
///
/// Implementations translate storage-level failures into the error
/// taxonomy: a uniqueness violation becomes `Conflict`, an elapsed
/// `deadline` becomes `Timeout`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert the full entity once, finishing before `deadline`.
    async fn create(&self, deadline: Instant, user: &User) -> AppResult<()>;
}

/// SeaORM-backed user repository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, deadline: Instant, user: &User) -> AppResult<()> {
        let model = UserActiveModel::from(user);
        insert_before(deadline, model.insert(&self.db)).await
    }
}

/// Drive an insert until `deadline`; dropping it on timeout aborts the statement.
async fn insert_before<T, F>(deadline: Instant, insert: F) -> AppResult<()>
where
    F: Future<Output = Result<T, DbErr>>,
{
    match timeout_at(deadline, insert).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(err)) => Err(map_insert_error(err)),
        Err(elapsed) => Err(AppError::timeout_with(elapsed, "user insert timed out")),
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    match err {
        DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(db)))
        | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(db))) => {
            db.is_unique_violation()
        }
        _ => false,
    }
}

/// Translate a storage error into the domain taxonomy.
fn map_insert_error(err: DbErr) -> AppError {
    if is_unique_violation(&err) {
        return AppError::conflict_with(err, "user with this email already exists");
    }
    AppError::from(err)
}
