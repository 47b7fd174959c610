//! Local preference store
//!
//! A small string key/value store on the device, used for the admin session
//! flag and the travel moment video list.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use tracing::warn;

use crate::Result;

pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// Preferences kept in a JSON file, rewritten on every change
pub struct FilePreferences {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FilePreferences {
    /// Open the store. A missing file starts empty; an unreadable one is
    /// logged and also starts empty.
    pub fn open(path: PathBuf) -> Result<Self> {
        let values = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Ignoring corrupt preferences at {}: {}", path.display(), e);
                BTreeMap::new()
            })
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn default_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "voyage", "voyage") {
            dirs.data_dir().join("preferences.json")
        } else {
            PathBuf::from("~/.voyage/preferences.json")
        }
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(values)?)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = lock(&self.values);
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = lock(&self.values);
        if values.remove(key).is_some() {
            self.persist(&values)?;
        }
        Ok(())
    }
}

/// In-process preferences
#[derive(Default)]
pub struct MemoryPreferences {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        lock(&self.values).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        lock(&self.values).remove(key);
        Ok(())
    }
}

fn lock(values: &Mutex<BTreeMap<String, String>>) -> MutexGuard<'_, BTreeMap<String, String>> {
    values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_preferences_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let prefs = FilePreferences::open(path.clone()).unwrap();
        assert_eq!(prefs.get("adminLoggedIn"), None);
        prefs.set("adminLoggedIn", "true").unwrap();
        prefs.set("adminEmail", "ops@example.com").unwrap();
        prefs.remove("adminEmail").unwrap();

        let reopened = FilePreferences::open(path).unwrap();
        assert_eq!(reopened.get("adminLoggedIn").as_deref(), Some("true"));
        assert_eq!(reopened.get("adminEmail"), None);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{not json").unwrap();

        let prefs = FilePreferences::open(path).unwrap();
        assert_eq!(prefs.get("anything"), None);
        prefs.set("k", "v").unwrap();
        assert_eq!(prefs.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_memory_preferences() {
        let prefs = MemoryPreferences::new();
        prefs.set("k", "v").unwrap();
        assert_eq!(prefs.get("k").as_deref(), Some("v"));
        prefs.remove("k").unwrap();
        assert_eq!(prefs.get("k"), None);
    }
}
