//! Create-user use case tests against in-memory collaborators.

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio_test::{assert_err, assert_ok};

use common::{manager, registration, InMemoryUsers, StalledUsers, STORAGE_URL};
use university_platform::domain::{Id, UserError, UserType};
use university_platform::errors::{is_timeout, ErrorKind};
use university_platform::services::UserService;

#[tokio::test]
async fn test_register_student() {
    let repo = Arc::new(InMemoryUsers::default());
    let service = manager(repo.clone());

    let output = assert_ok!(service.create_user(registration("a@b.com", "student")).await);

    assert!(!output.id.is_empty());
    let id = assert_ok!(Id::parse(&output.id));
    assert!(!id.is_empty());

    let user = repo.find_by_email("a@b.com").expect("user stored");
    assert_eq!(user.id(), id);
    assert!(user.is_active());
    assert!(user.is_student());
    assert_eq!(user.created_at(), output.created_at);
    assert_eq!(
        user.avatar_url(),
        Some(format!("{}/users/{}/avatar.jpg", STORAGE_URL, output.id).as_str())
    );
}

#[tokio::test]
async fn test_new_user_is_stored_unmodified_since_creation() {
    let repo = Arc::new(InMemoryUsers::default());
    let service = manager(repo.clone());

    assert_ok!(service.create_user(registration("a@b.com", "student")).await);

    let user = repo.find_by_email("a@b.com").expect("user stored");
    assert!(user.avatar_url().is_some());
    assert_eq!(user.created_at(), user.updated_at());
}

#[tokio::test]
async fn test_email_is_stored_normalized() {
    let repo = Arc::new(InMemoryUsers::default());
    let service = manager(repo.clone());

    assert_ok!(service.create_user(registration("  Ada@Example.COM ", "professor")).await);

    let user = repo.find_by_email("ada@example.com").expect("normalized key");
    assert_eq!(user.user_type(), UserType::Professor);
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let repo = Arc::new(InMemoryUsers::default());
    let service = manager(repo.clone());

    assert_ok!(service.create_user(registration("a@b.com", "student")).await);
    let err = assert_err!(service.create_user(registration("A@B.com", "admin")).await);

    assert!(err.is(ErrorKind::Conflict));
    assert_eq!(repo.len(), 1);
    assert_eq!(repo.calls(), 2);
}

#[tokio::test]
async fn test_invalid_email_skips_persistence() {
    let repo = Arc::new(InMemoryUsers::default());
    let service = manager(repo.clone());

    let err = assert_err!(service.create_user(registration("not-an-email", "student")).await);

    assert!(err.is(ErrorKind::InvalidInput));
    assert_eq!(err.find_cause::<UserError>(), Some(&UserError::InvalidEmail));
    assert_eq!(repo.calls(), 0);
}

#[tokio::test]
async fn test_unknown_user_type_skips_persistence() {
    let repo = Arc::new(InMemoryUsers::default());
    let service = manager(repo.clone());

    let err = assert_err!(service.create_user(registration("a@b.com", "dean")).await);

    assert!(err.is(ErrorKind::InvalidInput));
    assert_eq!(repo.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_slow_repository_times_out() {
    let service = manager(Arc::new(StalledUsers {
        delay: Duration::from_secs(6),
    }));

    let err = assert_err!(service.create_user(registration("a@b.com", "student")).await);

    assert!(err.is(ErrorKind::Timeout));
    assert!(is_timeout(&err));
}

#[tokio::test(start_paused = true)]
async fn test_repository_within_deadline_succeeds() {
    let service = manager(Arc::new(StalledUsers {
        delay: Duration::from_secs(4),
    }));

    assert_ok!(service.create_user(registration("a@b.com", "student")).await);
}
