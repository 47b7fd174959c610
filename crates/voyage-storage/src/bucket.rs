//! Object storage contract

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Descriptor returned after a successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Key of the object inside the bucket
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

/// A bucket of binary objects with public URLs
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `path`. Existing objects are not overwritten.
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<StoredObject>;

    /// Public URL for the object at `path`
    fn public_url(&self, path: &str) -> String;

    /// Remove objects by key
    async fn remove(&self, paths: &[String]) -> Result<()>;

    /// Map a public URL back to its object key, if it belongs to this bucket
    fn object_key(&self, url: &str) -> Option<String> {
        let base = self.public_url("");
        url.strip_prefix(&base)
            .and_then(|rest| rest.split(['?', '#']).next())
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }
}
