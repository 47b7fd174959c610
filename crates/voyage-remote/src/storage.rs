//! Hosted storage bucket

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;
use voyage_storage::{ObjectStore, Result, StoredObject};

use crate::http::{Endpoint, build_client, check, transport};

pub struct RestBucket {
    http: Client,
    endpoint: Endpoint,
    bucket: String,
    cache_control_secs: u64,
}

impl RestBucket {
    pub fn new(base_url: &str, api_key: &str, bucket: &str, cache_control_secs: u64) -> Result<Self> {
        Ok(Self {
            http: build_client()?,
            endpoint: Endpoint::new(base_url, api_key),
            bucket: bucket.to_string(),
            cache_control_secs,
        })
    }

    fn object_url(&self, path: &str) -> String {
        self.endpoint
            .url(&format!("storage/v1/object/{}/{}", self.bucket, path))
    }
}

#[async_trait]
impl ObjectStore for RestBucket {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<StoredObject> {
        let size = bytes.len() as u64;
        let request = self
            .http
            .post(self.object_url(path))
            .header("content-type", content_type)
            .header("cache-control", format!("max-age={}", self.cache_control_secs))
            .header("x-upsert", "false")
            .body(bytes);
        let response = self
            .endpoint
            .authorize(request)
            .send()
            .await
            .map_err(transport)?;
        check(response).await?;
        debug!("Uploaded {path} to {} ({size} bytes)", self.bucket);

        Ok(StoredObject {
            path: path.to_string(),
            size_bytes: Some(size),
            content_hash: None,
        })
    }

    fn public_url(&self, path: &str) -> String {
        self.endpoint
            .url(&format!("storage/v1/object/public/{}/{}", self.bucket, path))
    }

    async fn remove(&self, paths: &[String]) -> Result<()> {
        let request = self
            .http
            .delete(self.endpoint.url(&format!("storage/v1/object/{}", self.bucket)))
            .json(&json!({ "prefixes": paths }));
        let response = self
            .endpoint
            .authorize(request)
            .send()
            .await
            .map_err(transport)?;
        check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let bucket = RestBucket::new("https://abc.example.co/", "anon", "package-images", 3600).unwrap();
        assert_eq!(
            bucket.object_url("packages/1-x.jpg"),
            "https://abc.example.co/storage/v1/object/package-images/packages/1-x.jpg"
        );
        let public = bucket.public_url("packages/1-x.jpg");
        assert_eq!(
            public,
            "https://abc.example.co/storage/v1/object/public/package-images/packages/1-x.jpg"
        );
        assert_eq!(bucket.object_key(&public).as_deref(), Some("packages/1-x.jpg"));
    }
}
