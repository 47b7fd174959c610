//! Media uploads into the public bucket

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures_util::future::join_all;
use time::OffsetDateTime;
use tracing::{error, info};
use uuid::Uuid;
use voyage_core::MediaFile;
use voyage_storage::ObjectStore;

use crate::notify::{Notification, Notifier};

pub struct MediaUploader {
    store: Arc<dyn ObjectStore>,
    notifier: Arc<dyn Notifier>,
    in_flight: AtomicUsize,
}

impl MediaUploader {
    pub fn new(store: Arc<dyn ObjectStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// True while at least one upload is running
    pub fn is_uploading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Upload one file under `prefix` and return its public URL
    pub async fn upload(&self, file: MediaFile, prefix: Option<&str>) -> Option<String> {
        let _guard = InFlight::enter(&self.in_flight);

        let path = object_path(&file, prefix);
        let size = file.size();
        match self.store.upload(&path, file.bytes, &file.content_type).await {
            Ok(stored) => {
                let url = self.store.public_url(&stored.path);
                info!("Uploaded {} as {} ({size} bytes)", file.name, stored.path);
                self.notifier
                    .notify(Notification::success("Image uploaded successfully"));
                Some(url)
            }
            Err(e) => {
                error!("Error uploading {}: {e}", file.name);
                self.notifier
                    .notify(Notification::error("Upload Failed", e.to_string()));
                None
            }
        }
    }

    /// Upload concurrently. Failed files are dropped, the rest keep input order.
    pub async fn upload_many(&self, files: Vec<MediaFile>, prefix: Option<&str>) -> Vec<String> {
        let uploads = files.into_iter().map(|file| self.upload(file, prefix));
        join_all(uploads).await.into_iter().flatten().collect()
    }

    /// Remove the object behind a public URL
    pub async fn delete(&self, url: &str) -> bool {
        let Some(key) = self.object_key(url) else {
            error!("Cannot derive an object key from {url}");
            self.notifier
                .notify(Notification::error("Delete Failed", format!("Not a media URL: {url}")));
            return false;
        };

        match self.store.remove(&[key.clone()]).await {
            Ok(()) => {
                info!("Deleted {key}");
                self.notifier
                    .notify(Notification::success("Image deleted successfully"));
                true
            }
            Err(e) => {
                error!("Error deleting {key}: {e}");
                self.notifier
                    .notify(Notification::error("Delete Failed", e.to_string()));
                false
            }
        }
    }

    /// Object key for `url`. URLs from another host fall back to the last
    /// path segment.
    pub fn object_key(&self, url: &str) -> Option<String> {
        self.store.object_key(url).or_else(|| {
            let path = url.split(['?', '#']).next().unwrap_or(url);
            path.rsplit('/')
                .next()
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
        })
    }
}

/// `{prefix}/{millis}-{token}.{ext}`
pub fn object_path(file: &MediaFile, prefix: Option<&str>) -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let token = Uuid::new_v4().simple().to_string();
    let mut name = format!("{millis}-{}", &token[..12]);
    if let Some(ext) = file.extension() {
        name.push('.');
        name.push_str(ext);
    }
    match prefix.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{prefix}/{name}"),
        None => name,
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
