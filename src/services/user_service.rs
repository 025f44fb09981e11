//! User service - the create-user use case.
//!
//! Orchestrates password hashing, entity construction, avatar URL
//! derivation and persistence under a fixed deadline. Collaborators are
//! injected as trait objects so tests can swap them for doubles.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::{timeout_at, Instant};
use utoipa::ToSchema;

use crate::config::{AVATAR_FILENAME, AVATAR_FOLDER, USER_PERSIST_TIMEOUT_SECS};
use crate::domain::password::PASSWORD_PROCESSING_FAILED;
use crate::domain::{Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::{ObjectStorage, UserRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Registration data, already checked by the request boundary.
#[derive(Clone)]
pub struct CreateUserInput {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: String,
}

// Never print the plaintext password
impl std::fmt::Debug for CreateUserInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserInput")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("user_type", &self.user_type)
            .finish()
    }
}

/// Result of a successful registration
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateUserOutput {
    /// Identifier of the new user
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// User service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a new user.
    ///
    /// Returns the new id and creation time, or a single typed error:
    /// `InvalidInput` for field violations, `Internal` when the password
    /// cannot be hashed, and whatever the repository reports otherwise
    /// (`Conflict` for a duplicate email, `Timeout` past the deadline).
    async fn create_user(&self, input: CreateUserInput) -> AppResult<CreateUserOutput>;
}

/// Concrete implementation of UserService.
pub struct UserManager {
    repository: Arc<dyn UserRepository>,
    storage: Arc<dyn ObjectStorage>,
    persist_timeout: Duration,
}

impl UserManager {
    pub fn new(repository: Arc<dyn UserRepository>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            repository,
            storage,
            persist_timeout: Duration::from_secs(USER_PERSIST_TIMEOUT_SECS),
        }
    }

    /// Deadline applied to the persistence step.
    pub fn persist_timeout(&self) -> Duration {
        self.persist_timeout
    }
}

/// Hash off the async executor; Argon2 is deliberately slow.
async fn hash_password(password: String) -> AppResult<Password> {
    tokio::task::spawn_blocking(move || Password::hash(&password))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "password hashing task failed");
            AppError::internal(PASSWORD_PROCESSING_FAILED)
        })?
}

#[async_trait]
impl UserService for UserManager {
    #[tracing::instrument(skip_all, fields(user_type = %input.user_type))]
    async fn create_user(&self, input: CreateUserInput) -> AppResult<CreateUserOutput> {
        let CreateUserInput {
            email,
            password,
            first_name,
            last_name,
            user_type,
        } = input;

        let password_hash = hash_password(password).await?;

        let user = User::new(
            &email,
            password_hash.into_string(),
            &first_name,
            &last_name,
            &user_type,
            None,
        )?;

        let avatar_url =
            self.storage
                .build_object_url(AVATAR_FOLDER, &user.id().to_string(), AVATAR_FILENAME);
        let user = user.with_avatar_url(avatar_url);

        let deadline = Instant::now() + self.persist_timeout;
        let persisted = match timeout_at(deadline, self.repository.create(deadline, &user)).await {
            Ok(result) => result,
            Err(elapsed) => Err(AppError::timeout_with(elapsed, "user persistence timed out")),
        };
        if let Err(e) = persisted {
            tracing::warn!(kind = %e.kind(), "user persistence failed: {}", e);
            return Err(e);
        }

        tracing::info!(user_id = %user.id(), "user registered");

        Ok(CreateUserOutput {
            id: user.id().to_string(),
            created_at: user.created_at(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::domain::{Id, UserError, UserType};
    use crate::errors::ErrorKind;
    use crate::infra::{MockObjectStorage, MockUserRepository};

    fn input(email: &str) -> CreateUserInput {
        CreateUserInput {
            email: email.to_string(),
            password: "longenough1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            user_type: "student".to_string(),
        }
    }

    fn cdn_storage() -> MockObjectStorage {
        let mut storage = MockObjectStorage::new();
        storage
            .expect_build_object_url()
            .returning(|folder, owner, file| format!("https://cdn.test/{}/{}/{}", folder, owner, file));
        storage
    }

    fn service(repo: MockUserRepository, storage: MockObjectStorage) -> UserManager {
        UserManager::new(Arc::new(repo), Arc::new(storage))
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let stored: Arc<Mutex<Option<User>>> = Arc::new(Mutex::new(None));
        let sink = stored.clone();

        let mut repo = MockUserRepository::new();
        repo.expect_create().times(1).returning(move |_, user: &User| {
            *sink.lock().unwrap() = Some(user.clone());
            Ok(())
        });

        let output = service(repo, cdn_storage())
            .create_user(input("A@B.com"))
            .await
            .unwrap();

        let user = stored.lock().unwrap().take().expect("user persisted");
        assert!(!output.id.is_empty());
        assert_eq!(output.id, user.id().to_string());
        assert_eq!(output.created_at, user.created_at());
        assert_eq!(user.updated_at(), user.created_at());
        assert!(Id::parse(&output.id).unwrap().validate().is_ok());

        assert!(user.is_active());
        assert_eq!(user.email(), "a@b.com");
        assert_eq!(user.user_type(), UserType::Student);
        assert_eq!(
            user.avatar_url(),
            Some(format!("https://cdn.test/users/{}/avatar.jpg", output.id).as_str())
        );
        assert!(user.validate().is_ok());
    }

    #[tokio::test]
    async fn test_password_is_hashed_before_persisting() {
        let stored: Arc<Mutex<Option<User>>> = Arc::new(Mutex::new(None));
        let sink = stored.clone();

        let mut repo = MockUserRepository::new();
        repo.expect_create().returning(move |_, user: &User| {
            *sink.lock().unwrap() = Some(user.clone());
            Ok(())
        });

        service(repo, cdn_storage())
            .create_user(input("a@b.com"))
            .await
            .unwrap();

        let user = stored.lock().unwrap().take().unwrap();
        assert_ne!(user.password_hash(), "longenough1");
        assert!(Password::from_hash(user.password_hash().to_string()).verify("longenough1"));
    }

    #[tokio::test]
    async fn test_invalid_email_never_reaches_repository() {
        let mut repo = MockUserRepository::new();
        repo.expect_create().never();
        let mut storage = MockObjectStorage::new();
        storage.expect_build_object_url().never();

        let err = service(repo, storage)
            .create_user(input("not-an-email"))
            .await
            .unwrap_err();

        assert!(err.is(ErrorKind::InvalidInput));
        assert_eq!(err.find_cause::<UserError>(), Some(&UserError::InvalidEmail));
    }

    #[tokio::test]
    async fn test_invalid_user_type_is_rejected() {
        let mut repo = MockUserRepository::new();
        repo.expect_create().never();

        let mut bad = input("a@b.com");
        bad.user_type = "janitor".to_string();

        let err = service(repo, cdn_storage()).create_user(bad).await.unwrap_err();
        assert_eq!(err.find_cause::<UserError>(), Some(&UserError::InvalidUserType));
    }

    #[tokio::test]
    async fn test_blank_names_are_rejected() {
        let mut repo = MockUserRepository::new();
        repo.expect_create().never();
        let svc = service(repo, cdn_storage());

        let mut bad = input("a@b.com");
        bad.first_name = "   ".to_string();
        let err = svc.create_user(bad).await.unwrap_err();
        assert_eq!(err.find_cause::<UserError>(), Some(&UserError::EmptyFirstName));

        let mut bad = input("a@b.com");
        bad.last_name = String::new();
        let err = svc.create_user(bad).await.unwrap_err();
        assert_eq!(err.find_cause::<UserError>(), Some(&UserError::EmptyLastName));
    }

    #[tokio::test]
    async fn test_conflict_propagates_unchanged() {
        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .returning(|_, _| Err(AppError::conflict("user with this email already exists")));

        let err = service(repo, cdn_storage())
            .create_user(input("a@b.com"))
            .await
            .unwrap_err();

        assert!(err.is(ErrorKind::Conflict));
        assert_eq!(err.message(), "user with this email already exists");
    }

    #[tokio::test]
    async fn test_other_repository_errors_propagate_unchanged() {
        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .returning(|_, _| Err(AppError::internal("pool exhausted")));

        let err = service(repo, cdn_storage())
            .create_user(input("a@b.com"))
            .await
            .unwrap_err();

        assert!(err.is(ErrorKind::Internal));
        assert_eq!(err.message(), "pool exhausted");
    }

    #[tokio::test]
    async fn test_repository_receives_five_second_deadline() {
        let mut repo = MockUserRepository::new();
        repo.expect_create().returning(|deadline, _| {
            let remaining = deadline.saturating_duration_since(Instant::now());
            assert!(remaining <= Duration::from_secs(USER_PERSIST_TIMEOUT_SECS));
            assert!(remaining > Duration::from_secs(USER_PERSIST_TIMEOUT_SECS - 1));
            Ok(())
        });

        let svc = service(repo, cdn_storage());
        assert_eq!(svc.persist_timeout(), Duration::from_secs(5));
        svc.create_user(input("a@b.com")).await.unwrap();
    }

    #[test]
    fn test_input_debug_redacts_password() {
        let debug = format!("{:?}", input("a@b.com"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("longenough1"));
    }
}
