//! Test doubles shared by the engine's unit tests

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use voyage_core::Row;
use voyage_storage::{
    DataClient, LocalStore, ObjectStore, Query, Result, StorageError, StoredObject,
};

pub async fn local_store() -> (tempfile::TempDir, LocalStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(Some(dir.path().join("voyage.db")))
        .await
        .unwrap();
    (dir, store)
}

fn unreachable_backend() -> StorageError {
    StorageError::Transport("connection refused".into())
}

/// Every call fails as if the backend were unreachable
#[derive(Default)]
pub struct FailingClient {
    inserts: AtomicUsize,
}

impl FailingClient {
    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataClient for FailingClient {
    async fn select(&self, _table: &str, _query: &Query) -> Result<Vec<Row>> {
        Err(unreachable_backend())
    }

    async fn insert(&self, _table: &str, _row: Row) -> Result<Row> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Err(unreachable_backend())
    }

    async fn update(&self, _table: &str, _id: &str, _patch: Row) -> Result<Option<Row>> {
        Err(unreachable_backend())
    }

    async fn delete(&self, _table: &str, _id: &str) -> Result<bool> {
        Err(unreachable_backend())
    }

    async fn rpc(&self, _function: &str, _args: Value) -> Result<Value> {
        Err(unreachable_backend())
    }
}

/// Rejects uploads whose object key contains `reject`
pub struct FlakyStore {
    pub reject: String,
}

#[async_trait]
impl ObjectStore for FlakyStore {
    async fn upload(&self, path: &str, bytes: Vec<u8>, _content_type: &str) -> Result<StoredObject> {
        if path.contains(&self.reject) {
            return Err(StorageError::Remote {
                status: 413,
                message: "Payload too large".into(),
            });
        }
        // Let the other uploads of a batch overlap
        tokio::task::yield_now().await;
        Ok(StoredObject {
            path: path.to_string(),
            size_bytes: Some(bytes.len() as u64),
            content_hash: None,
        })
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://cdn.example.com/media/{path}")
    }

    async fn remove(&self, _paths: &[String]) -> Result<()> {
        Err(unreachable_backend())
    }
}
