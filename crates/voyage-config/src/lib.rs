use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;
use voyage_core::MediaLimits;

/// Configuration for voyage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,

    /// Preference file (admin session flag, travel moments)
    #[serde(default)]
    pub preferences_path: Option<PathBuf>,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub local: LocalConfig,

    #[serde(default)]
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// SQLite database and a media directory on this machine
    #[default]
    Local,
    /// The hosted backend
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_bucket")]
    pub bucket: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalConfig {
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    #[serde(default)]
    pub media_dir: Option<PathBuf>,

    #[serde(default)]
    pub public_base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "default_cache_control")]
    pub cache_control_secs: u64,

    #[serde(default = "default_max_images")]
    pub max_images: usize,

    #[serde(default = "default_max_package_videos")]
    pub max_package_videos: usize,

    #[serde(default = "default_max_moment_videos")]
    pub max_moment_videos: usize,

    #[serde(default = "default_max_video_bytes")]
    pub max_video_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            preferences_path: None,
            remote: RemoteConfig::default(),
            local: LocalConfig::default(),
            media: MediaConfig::default(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            bucket: default_bucket(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            cache_control_secs: default_cache_control(),
            max_images: default_max_images(),
            max_package_videos: default_max_package_videos(),
            max_moment_videos: default_max_moment_videos(),
            max_video_bytes: default_max_video_bytes(),
        }
    }
}

impl MediaConfig {
    pub fn limits(&self) -> MediaLimits {
        MediaLimits {
            max_images: self.max_images,
            max_package_videos: self.max_package_videos,
            max_moment_videos: self.max_moment_videos,
            max_video_bytes: self.max_video_bytes,
        }
    }
}

fn default_bucket() -> String {
    "package-images".to_string()
}

fn default_cache_control() -> u64 {
    3600
}

fn default_max_images() -> usize {
    MediaLimits::default().max_images
}

fn default_max_package_videos() -> usize {
    MediaLimits::default().max_package_videos
}

fn default_max_moment_videos() -> usize {
    MediaLimits::default().max_moment_videos
}

fn default_max_video_bytes() -> u64 {
    MediaLimits::default().max_video_bytes
}

impl Config {
    /// Load config from default location or create default if not found,
    /// then apply environment overrides
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load from an explicit path, writing defaults there if it is missing
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            // Create default config file
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(path, content)?;
            info!("Wrote default config to {}", path.display());
            Ok(config)
        }
    }

    /// `VOYAGE_BACKEND`, `VOYAGE_REMOTE_URL`, `VOYAGE_REMOTE_KEY`
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(backend) = var("VOYAGE_BACKEND") {
            self.backend = match backend.as_str() {
                "local" => Backend::Local,
                "remote" => Backend::Remote,
                other => anyhow::bail!("Invalid VOYAGE_BACKEND value: {other}"),
            };
        }
        if let Some(url) = var("VOYAGE_REMOTE_URL") {
            self.remote.url = url;
        }
        if let Some(key) = var("VOYAGE_REMOTE_KEY") {
            self.remote.api_key = key;
        }
        Ok(())
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "voyage", "voyage") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.voyage/config.toml")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend, Backend::Local);
        assert_eq!(config.remote.bucket, "package-images");
        assert_eq!(config.media.cache_control_secs, 3600);
        assert_eq!(config.media.limits(), MediaLimits::default());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.remote.bucket, config.remote.bucket);
        assert_eq!(parsed.media.max_video_bytes, config.media.max_video_bytes);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
backend = "remote"

[remote]
url = "https://abc.example.co"
api_key = "anon"

[media]
max_images = 8
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend, Backend::Remote);
        assert_eq!(config.remote.bucket, "package-images");
        assert_eq!(config.media.max_images, 8);
        assert_eq!(config.media.max_package_videos, 6);
    }

    #[test]
    fn test_load_from_creates_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voyage").join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.backend, Backend::Local);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env(|key| match key {
                "VOYAGE_BACKEND" => Some("remote".into()),
                "VOYAGE_REMOTE_URL" => Some("https://abc.example.co".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.backend, Backend::Remote);
        assert_eq!(config.remote.url, "https://abc.example.co");
        assert!(config.remote.api_key.is_empty());

        assert!(config.apply_env(|_| Some("cloud".into())).is_err());
    }
}
