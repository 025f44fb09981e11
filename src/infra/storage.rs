//! Object storage URL building.

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// URL builder a storage adapter must provide.
///
/// Pure and infallible: only the URL is computed, nothing is uploaded.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ObjectStorage: Send + Sync {
    /// Public URL of `filename` stored under `folder/owner_id/`.
    fn build_object_url(&self, folder: &str, owner_id: &str, filename: &str) -> String;
}

/// Storage adapter for a bucket served from a public base URL.
#[derive(Debug, Clone)]
pub struct PublicUrlStorage {
    base_url: String,
}

impl PublicUrlStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ObjectStorage for PublicUrlStorage {
    fn build_object_url(&self, folder: &str, owner_id: &str, filename: &str) -> String {
        format!("{}/{}/{}/{}", self.base_url, folder, owner_id, filename)
    }
}
