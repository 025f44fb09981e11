//! In-memory collaborators shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use university_platform::domain::User;
use university_platform::errors::{AppError, AppResult};
use university_platform::infra::{PublicUrlStorage, UserRepository};
use university_platform::services::{CreateUserInput, UserManager};

pub const STORAGE_URL: &str = "http://localhost:9000/university-platform";

/// Users keyed by email, mirroring the unique index on `users.email`.
#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<HashMap<String, User>>,
    calls: Mutex<usize>,
}

impl InMemoryUsers {
    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.users.lock().unwrap().get(email).cloned()
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create(&self, _deadline: Instant, user: &User) -> AppResult<()> {
        *self.calls.lock().unwrap() += 1;

        let mut users = self.users.lock().unwrap();
        if users.contains_key(user.email()) {
            return Err(AppError::conflict("user with this email already exists"));
        }
        users.insert(user.email().to_string(), user.clone());
        Ok(())
    }
}

/// Repository that never answers within the persistence deadline.
pub struct StalledUsers {
    pub delay: Duration,
}

#[async_trait]
impl UserRepository for StalledUsers {
    async fn create(&self, _deadline: Instant, _user: &User) -> AppResult<()> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

pub fn manager(repository: Arc<dyn UserRepository>) -> UserManager {
    UserManager::new(repository, Arc::new(PublicUrlStorage::new(STORAGE_URL)))
}

pub fn registration(email: &str, user_type: &str) -> CreateUserInput {
    CreateUserInput {
        email: email.to_string(),
        password: "longenough1".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        user_type: user_type.to_string(),
    }
}
