//! Travel moment videos (device-local collection)

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelMomentVideo {
    pub id: String,
    pub name: String,
    pub url: String,
    pub file_size: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl TravelMomentVideo {
    /// Record for a freshly uploaded file. The display name is the file name
    /// without its extension.
    pub fn new(file_name: &str, url: impl Into<String>, file_size: u64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: display_name(file_name),
            url: url.into(),
            file_size,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn apply(&mut self, patch: MomentPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(url) = patch.url {
            self.url = url;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MomentPatch {
    pub name: Option<String>,
    pub url: Option<String>,
}

fn display_name(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.contains('/') => stem.to_string(),
        _ => file_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_strips_extension() {
        assert_eq!(display_name("safari.day1.mp4"), "safari.day1");
        assert_eq!(display_name("clip"), "clip");
        assert_eq!(display_name(".hidden"), ".hidden");
    }

    #[test]
    fn test_apply_patch() {
        let mut video = TravelMomentVideo::new("reef.mov", "https://cdn/reef.mov", 1024);
        video.apply(MomentPatch {
            name: Some("Reef dive".into()),
            url: None,
        });
        assert_eq!(video.name, "Reef dive");
        assert_eq!(video.url, "https://cdn/reef.mov");
    }

    #[test]
    fn test_wire_format() {
        let video = TravelMomentVideo::new("a.mp4", "https://cdn/a.mp4", 10);
        let json = serde_json::to_value(&video).unwrap();
        assert!(json["created_at"].is_string());
        assert_eq!(json["file_size"], 10);
        let back: TravelMomentVideo = serde_json::from_value(json).unwrap();
        assert_eq!(back, video);
    }
}
