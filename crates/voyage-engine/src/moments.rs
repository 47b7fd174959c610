//! Travel moment videos kept in device preferences
//!
//! The whole list is stored as one JSON array under [`MOMENTS_KEY`] and
//! rewritten on every change.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};
use voyage_core::{MomentPatch, TravelMomentVideo};
use voyage_storage::{PreferenceStore, Result};

pub const MOMENTS_KEY: &str = "travelMomentVideos";

pub struct MomentLibrary {
    prefs: Arc<dyn PreferenceStore>,
    videos: Mutex<Vec<TravelMomentVideo>>,
}

impl MomentLibrary {
    /// Open the library and read the stored list
    pub fn new(prefs: Arc<dyn PreferenceStore>) -> Self {
        let library = Self {
            prefs,
            videos: Mutex::new(Vec::new()),
        };
        library.load();
        library
    }

    /// Re-read the stored list. Missing or unparseable data reads as empty.
    pub fn load(&self) -> Vec<TravelMomentVideo> {
        let videos = match self.prefs.get(MOMENTS_KEY) {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Ignoring unreadable travel moments: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        };
        *self.lock() = videos.clone();
        videos
    }

    pub fn videos(&self) -> Vec<TravelMomentVideo> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn add(&self, video: TravelMomentVideo) -> Result<()> {
        let mut videos = self.lock();
        let mut updated = videos.clone();
        updated.push(video);
        self.save(&mut videos, updated)
    }

    /// Returns false when no video has `id`
    pub fn update(&self, id: &str, patch: MomentPatch) -> Result<bool> {
        let mut videos = self.lock();
        let mut updated = videos.clone();
        let Some(video) = updated.iter_mut().find(|v| v.id == id) else {
            return Ok(false);
        };
        video.apply(patch);
        self.save(&mut videos, updated)?;
        Ok(true)
    }

    /// Returns false when no video has `id`
    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut videos = self.lock();
        let before = videos.len();
        let updated: Vec<_> = videos.iter().filter(|v| v.id != id).cloned().collect();
        if updated.len() == before {
            return Ok(false);
        }
        self.save(&mut videos, updated)?;
        Ok(true)
    }

    /// Persist first; memory only changes when the write succeeded
    fn save(
        &self,
        current: &mut Vec<TravelMomentVideo>,
        updated: Vec<TravelMomentVideo>,
    ) -> Result<()> {
        let raw = serde_json::to_string(&updated)?;
        self.prefs.set(MOMENTS_KEY, &raw)?;
        debug!("Saved {} travel moments", updated.len());
        *current = updated;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<TravelMomentVideo>> {
        self.videos
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
