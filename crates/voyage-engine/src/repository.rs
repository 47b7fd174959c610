//! Package repository: CRUD against one collection with a cached listing

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};
use voyage_core::{
    Collection, Error, NewPackage, Package, PackagePatch, PackageStatus, Result, Row, normalize_row,
    to_row, videos,
};
use voyage_storage::{DataClient, GENERATE_UNIQUE_SLUG, Query};

use crate::notify::{Notification, Notifier};

#[derive(Debug, Clone, Copy)]
enum Op {
    FetchAll,
    Fetch,
    Create,
    Update,
    Delete,
}

impl Op {
    fn verb(self) -> &'static str {
        match self {
            Op::FetchAll | Op::Fetch => "fetch",
            Op::Create => "create",
            Op::Update => "update",
            Op::Delete => "delete",
        }
    }

    fn past(self) -> &'static str {
        match self {
            Op::FetchAll | Op::Fetch => "fetched",
            Op::Create => "created",
            Op::Update => "updated",
            Op::Delete => "deleted",
        }
    }
}

struct Cache {
    packages: Vec<Package>,
    loading: bool,
}

pub struct PackageRepository {
    collection: Collection,
    client: Arc<dyn DataClient>,
    notifier: Arc<dyn Notifier>,
    cache: RwLock<Cache>,
    last_stamp: Mutex<OffsetDateTime>,
}

impl PackageRepository {
    pub fn new(
        collection: Collection,
        client: Arc<dyn DataClient>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            collection,
            client,
            notifier,
            cache: RwLock::new(Cache {
                packages: Vec::new(),
                loading: true,
            }),
            last_stamp: Mutex::new(OffsetDateTime::UNIX_EPOCH),
        }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// Cached listing from the last successful fetch, newest first
    pub async fn packages(&self) -> Vec<Package> {
        self.cache.read().await.packages.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.cache.read().await.loading
    }

    /// Re-fetch the listing. Same as [`fetch_all`](Self::fetch_all).
    pub async fn refresh(&self) -> Vec<Package> {
        self.fetch_all().await
    }

    /// Fetch every package, newest first, and replace the cache.
    ///
    /// On failure the cache is left as it was and an empty list is returned.
    pub async fn fetch_all(&self) -> Vec<Package> {
        self.cache.write().await.loading = true;
        let result = self.try_fetch_all().await;

        let mut cache = self.cache.write().await;
        cache.loading = false;
        match result {
            Ok(packages) => {
                cache.packages = packages.clone();
                packages
            }
            Err(e) => {
                drop(cache);
                self.fail(Op::FetchAll, &e);
                Vec::new()
            }
        }
    }

    async fn try_fetch_all(&self) -> Result<Vec<Package>> {
        let query = Query::new().order_by("created_at", true);
        let rows = self.client.select(self.table(), &query).await?;
        let packages = self.normalize_all(rows);
        debug!("Fetched {} rows from {}", packages.len(), self.table());
        Ok(packages)
    }

    /// Fetch a package by id. Not-found is `None` without a notification.
    pub async fn fetch_by_id(&self, id: &str) -> Option<Package> {
        match self.find_by_id(id).await {
            Ok(found) => found,
            Err(e) => {
                self.fail(Op::Fetch, &e);
                None
            }
        }
    }

    /// Fetch a published package by slug. Drafts are never returned.
    pub async fn fetch_by_slug(&self, slug: &str) -> Option<Package> {
        match self.find_by_slug(slug).await {
            Ok(found) => found,
            Err(e) => {
                self.fail(Op::Fetch, &e);
                None
            }
        }
    }

    /// Like [`fetch_by_id`](Self::fetch_by_id) but reports errors to the caller
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Package>> {
        self.find_one(Query::new().eq("id", id).limit(1)).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Package>> {
        let query = Query::new()
            .eq("slug", slug)
            .eq("status", PackageStatus::Published.as_str())
            .limit(1);
        self.find_one(query).await
    }

    async fn find_one(&self, query: Query) -> Result<Option<Package>> {
        let rows = self.client.select(self.table(), &query).await?;
        rows.into_iter().next().map(normalize_row).transpose()
    }

    /// Insert a new package with a server-generated unique slug, then refresh
    pub async fn create(&self, package: NewPackage) -> Option<Package> {
        match self.try_create(package).await {
            Ok(created) => {
                info!(
                    "Created {} {} ({})",
                    self.collection.noun(),
                    created.id,
                    created.slug
                );
                self.succeed(Op::Create);
                self.fetch_all().await;
                Some(created)
            }
            Err(e) => {
                self.fail(Op::Create, &e);
                None
            }
        }
    }

    async fn try_create(&self, mut package: NewPackage) -> Result<Package> {
        if package.title.trim().is_empty() {
            return Err(Error::InvalidPackage("title is required".into()));
        }
        let slug = self.generate_slug(&package.title).await?;

        videos::renumber(&mut package.videos);
        let mut row = to_row(&package)?;
        let now = format_timestamp(self.stamp())?;
        row.insert("slug".into(), Value::String(slug));
        row.insert("created_at".into(), Value::String(now.clone()));
        row.insert("updated_at".into(), Value::String(now));

        let inserted = self.client.insert(self.table(), row).await?;
        normalize_row(inserted)
    }

    async fn generate_slug(&self, title: &str) -> Result<String> {
        let args = json!({ "title_text": title, "table_name": self.table() });
        let value = self
            .client
            .rpc(GENERATE_UNIQUE_SLUG, args)
            .await
            .map_err(|e| Error::SlugGeneration(e.to_string()))?;
        match value {
            Value::String(slug) if !slug.trim().is_empty() => Ok(slug),
            other => Err(Error::SlugGeneration(format!(
                "unexpected response: {other}"
            ))),
        }
    }

    /// Apply a partial update and stamp `updated_at`, then refresh
    pub async fn update(&self, id: &str, patch: PackagePatch) -> Option<Package> {
        match self.try_update(id, patch).await {
            Ok(updated) => {
                info!("Updated {} {}", self.collection.noun(), updated.id);
                self.succeed(Op::Update);
                self.fetch_all().await;
                Some(updated)
            }
            Err(e) => {
                self.fail(Op::Update, &e);
                None
            }
        }
    }

    async fn try_update(&self, id: &str, mut patch: PackagePatch) -> Result<Package> {
        if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(Error::InvalidPackage("title is required".into()));
        }
        if let Some(list) = patch.videos.as_mut() {
            videos::renumber(list);
        }
        let mut row: Row = to_row(&patch)?;
        row.insert(
            "updated_at".into(),
            Value::String(format_timestamp(self.stamp())?),
        );

        let updated = self
            .client
            .update(self.table(), id, row)
            .await?
            .ok_or_else(|| Error::PackageNotFound(id.to_string()))?;
        normalize_row(updated)
    }

    /// Remove a package. A missing id counts as a failure.
    pub async fn delete(&self, id: &str) -> bool {
        let result = match self.client.delete(self.table(), id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(Error::PackageNotFound(id.to_string())),
            Err(e) => Err(e.into()),
        };
        match result {
            Ok(()) => {
                info!("Deleted {} {id}", self.collection.noun());
                self.succeed(Op::Delete);
                self.fetch_all().await;
                true
            }
            Err(e) => {
                self.fail(Op::Delete, &e);
                false
            }
        }
    }

    pub async fn publish(&self, id: &str) -> Option<Package> {
        self.update(id, PackagePatch::status(PackageStatus::Published))
            .await
    }

    pub async fn unpublish(&self, id: &str) -> Option<Package> {
        self.update(id, PackagePatch::status(PackageStatus::Draft))
            .await
    }

    fn table(&self) -> &'static str {
        self.collection.table()
    }

    fn normalize_all(&self, rows: Vec<Row>) -> Vec<Package> {
        rows.into_iter()
            .filter_map(|row| match normalize_row(row) {
                Ok(package) => Some(package),
                Err(e) => {
                    warn!("Skipping row in {}: {}", self.table(), e);
                    None
                }
            })
            .collect()
    }

    /// Next write timestamp, truncated to microseconds and strictly after
    /// every stamp this repository handed out before
    fn stamp(&self) -> OffsetDateTime {
        let now = OffsetDateTime::now_utc();
        let now = now
            .replace_nanosecond(now.nanosecond() / 1_000 * 1_000)
            .unwrap_or(now);

        let mut last = self
            .last_stamp
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let next = if now > *last {
            now
        } else {
            *last + Duration::microseconds(1)
        };
        *last = next;
        next
    }

    fn succeed(&self, op: Op) {
        let noun = self.collection.noun();
        let mut chars = noun.chars();
        let noun = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        };
        self.notifier
            .notify(Notification::success(format!("{noun} {} successfully", op.past())));
    }

    fn fail(&self, op: Op, err: &Error) {
        let noun = self.collection.noun();
        error!("Failed to {} {noun}: {err}", op.verb());
        let message = match op {
            Op::FetchAll => format!("Failed to fetch {noun}s"),
            _ => format!("Failed to {} {noun}", op.verb()),
        };
        self.notifier.notify(Notification::error("Error", message));
    }
}

fn format_timestamp(at: OffsetDateTime) -> Result<String> {
    at.format(&Rfc3339)
        .map_err(|e| Error::Other(anyhow::anyhow!("Failed to format timestamp: {}", e)))
}
