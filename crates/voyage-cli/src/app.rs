use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;
use tracing::debug;
use voyage_config::{Backend, Config};
use voyage_core::MediaLimits;
use voyage_engine::{
    AdminSession, Catalog, CredentialVerifier, Level, MediaUploader, MomentLibrary, Notification,
    Notifier,
};
use voyage_remote::{RestAuth, RestBucket, RestClient};
use voyage_storage::{BlobBucket, DataClient, FilePreferences, LocalStore, ObjectStore};

/// Prints engine notifications to the terminal
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Success => println!("✓ {}", notification.message),
            Level::Error => eprintln!("✗ {}: {}", notification.title, notification.message),
        }
    }
}

/// Everything a command needs, wired for the configured backend
pub struct App {
    pub catalog: Catalog,
    pub uploader: MediaUploader,
    pub moments: MomentLibrary,
    pub session: AdminSession,
    /// Only the remote backend can check credentials
    pub verifier: Option<Arc<dyn CredentialVerifier>>,
    pub limits: MediaLimits,
}

impl App {
    pub async fn open(config: &Config) -> Result<Self> {
        let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);

        let mut verifier: Option<Arc<dyn CredentialVerifier>> = None;
        let (client, store): (Arc<dyn DataClient>, Arc<dyn ObjectStore>) = match config.backend {
            Backend::Local => {
                let db = LocalStore::new(config.local.database_path.clone()).await?;
                let media_dir = config
                    .local
                    .media_dir
                    .clone()
                    .unwrap_or_else(default_media_dir);
                let bucket = BlobBucket::new(media_dir, config.local.public_base_url.clone())?;
                (Arc::new(db), Arc::new(bucket))
            }
            Backend::Remote => {
                let remote = &config.remote;
                if remote.url.is_empty() {
                    bail!("Remote backend selected but remote.url is not set (or VOYAGE_REMOTE_URL)");
                }
                let client = RestClient::new(&remote.url, &remote.api_key)?;
                let bucket = RestBucket::new(
                    &remote.url,
                    &remote.api_key,
                    &remote.bucket,
                    config.media.cache_control_secs,
                )?;
                let auth = RestAuth::new(&remote.url, &remote.api_key)?;
                verifier = Some(Arc::new(HostedVerifier(auth)));
                (Arc::new(client), Arc::new(bucket))
            }
        };
        debug!("Using {:?} backend", config.backend);

        let prefs_path = config
            .preferences_path
            .clone()
            .unwrap_or_else(FilePreferences::default_path);
        let prefs = Arc::new(FilePreferences::open(prefs_path)?);

        Ok(Self {
            catalog: Catalog::new(client, notifier.clone()),
            uploader: MediaUploader::new(store, notifier),
            moments: MomentLibrary::new(prefs.clone()),
            session: AdminSession::new(prefs),
            verifier,
            limits: config.media.limits(),
        })
    }
}

/// Checks admin credentials with the hosted auth service
struct HostedVerifier(RestAuth);

#[async_trait]
impl CredentialVerifier for HostedVerifier {
    async fn verify(&self, email: &str, password: &str) -> anyhow::Result<bool> {
        Ok(self.0.sign_in(email, password).await?)
    }
}

fn default_media_dir() -> PathBuf {
    if let Some(dirs) = directories::ProjectDirs::from("com", "voyage", "voyage") {
        dirs.data_dir().join("media")
    } else {
        PathBuf::from("~/.voyage/media")
    }
}
