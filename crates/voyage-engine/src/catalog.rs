//! Both package collections behind one handle

use std::sync::Arc;

use tracing::{debug, warn};
use voyage_core::{Collection, Package};
use voyage_storage::DataClient;

use crate::notify::Notifier;
use crate::repository::PackageRepository;

pub struct Catalog {
    travel: PackageRepository,
    discovery: PackageRepository,
}

impl Catalog {
    pub fn new(client: Arc<dyn DataClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            travel: PackageRepository::new(Collection::Travel, client.clone(), notifier.clone()),
            discovery: PackageRepository::new(Collection::Discovery, client, notifier),
        }
    }

    pub fn travel(&self) -> &PackageRepository {
        &self.travel
    }

    pub fn discovery(&self) -> &PackageRepository {
        &self.discovery
    }

    pub fn repository(&self, collection: Collection) -> &PackageRepository {
        match collection {
            Collection::Travel => &self.travel,
            Collection::Discovery => &self.discovery,
        }
    }

    /// Resolve a detail-page identifier.
    ///
    /// Tried in order: travel id, discovery id, published travel slug. The
    /// first hit wins. A failed lookup on one key falls through to the next
    /// and are not notified.
    pub async fn lookup(&self, ident: &str) -> Option<(Collection, Package)> {
        let attempts = [
            (Collection::Travel, Key::Id),
            (Collection::Discovery, Key::Id),
            (Collection::Travel, Key::Slug),
        ];

        for (collection, key) in attempts {
            let repo = self.repository(collection);
            let found = match key {
                Key::Id => repo.find_by_id(ident).await,
                Key::Slug => repo.find_by_slug(ident).await,
            };
            match found {
                Ok(Some(package)) => {
                    debug!("Resolved {ident} as {collection} {key:?}");
                    return Some((collection, package));
                }
                Ok(None) => {}
                Err(e) => warn!("Lookup of {ident} in {collection} by {key:?} failed: {e}"),
            }
        }
        None
    }
}

#[derive(Debug, Clone, Copy)]
enum Key {
    Id,
    Slug,
}
