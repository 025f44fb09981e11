//! Application state shared by every handler.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, PublicUrlStorage, UserStore};
use crate::services::{UserManager, UserService};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// User registration use case
    pub user_service: Arc<dyn UserService>,
    /// Database handle, used by the health check
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire the production collaborators from a connected database.
    pub fn from_config(database: Arc<Database>, config: &Config) -> Self {
        let repository = Arc::new(UserStore::new(database.get_connection()));
        let storage = Arc::new(PublicUrlStorage::new(config.storage_public_url.clone()));
        let user_service = Arc::new(UserManager::new(repository, storage));

        Self::new(user_service, database)
    }

    /// Create state with manually injected services.
    pub fn new(user_service: Arc<dyn UserService>, database: Arc<Database>) -> Self {
        Self {
            user_service,
            database,
        }
    }
}
