//! Filesystem bucket
//!
//! Local counterpart of the hosted storage bucket. Objects live under
//! `{root}/{path}` and are served from `{public_base_url}/{path}`.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::bucket::{ObjectStore, StoredObject};
use crate::{Result, StorageError};

pub struct BlobBucket {
    root: PathBuf,
    public_base_url: String,
}

impl BlobBucket {
    /// Create the bucket, making `root` if needed. Without a base URL objects
    /// are addressed with `file://` URLs.
    pub fn new(root: PathBuf, public_base_url: Option<String>) -> Result<Self> {
        std::fs::create_dir_all(&root)?;
        let public_base_url = public_base_url
            .unwrap_or_else(|| format!("file://{}", root.display()))
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            root,
            public_base_url,
        })
    }

    /// Read an object back
    pub async fn retrieve(&self, path: &str) -> Result<Vec<u8>> {
        let file = self.path_for(path)?;
        match tokio::fs::read(&file).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::ObjectNotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn exists(&self, path: &str) -> bool {
        self.path_for(path).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Resolve an object key to a file under the root, refusing keys that
    /// would escape it
    fn path_for(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let safe = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(StorageError::InvalidRow(format!("invalid object key: {path}")));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for BlobBucket {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<StoredObject> {
        let file = self.path_for(path)?;
        if tokio::fs::try_exists(&file).await? {
            return Err(StorageError::ObjectExists(path.to_string()));
        }
        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let hash = blake3::hash(&bytes).to_hex().to_string();
        let size = bytes.len() as u64;
        tokio::fs::write(&file, bytes).await?;
        debug!("Stored {path} ({size} bytes, {content_type})");

        Ok(StoredObject {
            path: path.to_string(),
            size_bytes: Some(size),
            content_hash: Some(hash),
        })
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base_url, path)
    }

    async fn remove(&self, paths: &[String]) -> Result<()> {
        for path in paths {
            let file = self.path_for(path)?;
            match tokio::fs::remove_file(&file).await {
                Ok(()) => debug!("Removed {path}"),
                // Removing a missing object is not an error for the hosted bucket either
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket() -> (tempfile::TempDir, BlobBucket) {
        let dir = tempfile::tempdir().unwrap();
        let bucket = BlobBucket::new(
            dir.path().join("package-images"),
            Some("http://localhost:8080/media/".into()),
        )
        .unwrap();
        (dir, bucket)
    }

    #[tokio::test]
    async fn test_upload_and_retrieve() {
        let (_dir, bucket) = bucket();
        let stored = bucket
            .upload("packages/a.jpg", b"jpeg".to_vec(), "image/jpeg")
            .await
            .unwrap();
        assert_eq!(stored.path, "packages/a.jpg");
        assert_eq!(stored.size_bytes, Some(4));
        assert_eq!(
            stored.content_hash.as_deref(),
            Some(blake3::hash(b"jpeg").to_hex().as_str())
        );
        assert!(bucket.exists("packages/a.jpg"));
        assert_eq!(bucket.retrieve("packages/a.jpg").await.unwrap(), b"jpeg");
    }

    #[tokio::test]
    async fn test_no_overwrite() {
        let (_dir, bucket) = bucket();
        bucket.upload("a.jpg", vec![1], "image/jpeg").await.unwrap();
        assert!(matches!(
            bucket.upload("a.jpg", vec![2], "image/jpeg").await,
            Err(StorageError::ObjectExists(_))
        ));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let (_dir, bucket) = bucket();
        bucket.upload("a.jpg", vec![1], "image/jpeg").await.unwrap();
        bucket.remove(&["a.jpg".to_string()]).await.unwrap();
        assert!(!bucket.exists("a.jpg"));
        bucket.remove(&["a.jpg".to_string()]).await.unwrap();
    }

    #[test]
    fn test_public_url_and_key() {
        let (_dir, bucket) = bucket();
        let url = bucket.public_url("packages/a.jpg");
        assert_eq!(url, "http://localhost:8080/media/packages/a.jpg");
        assert_eq!(bucket.object_key(&url).as_deref(), Some("packages/a.jpg"));
        assert_eq!(
            bucket.object_key(&format!("{url}?v=2#top")).as_deref(),
            Some("packages/a.jpg")
        );
        assert_eq!(bucket.object_key("https://elsewhere/a.jpg"), None);
    }

    #[tokio::test]
    async fn test_rejects_escaping_keys() {
        let (_dir, bucket) = bucket();
        assert!(bucket.upload("../x", vec![], "text/plain").await.is_err());
        assert!(bucket.upload("/etc/x", vec![], "text/plain").await.is_err());
    }
}
