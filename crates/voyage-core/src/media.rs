//! Media files and the admin-side upload rules

use std::path::Path;

use crate::{Error, Result};

const MIB: u64 = 1024 * 1024;

/// A file picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl MediaFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            name,
            bytes,
            content_type,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Other(anyhow::anyhow!("Invalid file name: {}", path.display())))?;
        Ok(Self::new(name, bytes))
    }

    /// Extension of the original file name, if any
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_video(&self) -> bool {
        self.content_type.starts_with("video/")
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// Caps applied by admin forms before anything reaches the upload service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaLimits {
    pub max_images: usize,
    pub max_package_videos: usize,
    pub max_moment_videos: usize,
    pub max_video_bytes: u64,
}

impl Default for MediaLimits {
    fn default() -> Self {
        Self {
            max_images: 4,
            max_package_videos: 6,
            max_moment_videos: 7,
            max_video_bytes: 60 * MIB,
        }
    }
}

impl MediaLimits {
    pub fn check_video(&self, file: &MediaFile) -> Result<()> {
        if !file.is_video() {
            return Err(Error::InvalidPackage(format!(
                "{} is not a video file",
                file.name
            )));
        }
        if file.size() > self.max_video_bytes {
            return Err(Error::InvalidPackage(format!(
                "{} exceeds {}MB limit ({}MB)",
                file.name,
                self.max_video_bytes / MIB,
                (file.size() as f64 / MIB as f64).round()
            )));
        }
        Ok(())
    }

    pub fn check_image(&self, file: &MediaFile) -> Result<()> {
        if file.is_image() {
            Ok(())
        } else {
            Err(Error::InvalidPackage(format!(
                "{} is not an image file",
                file.name
            )))
        }
    }
}

/// How many more items fit under `max`
pub fn remaining_slots(current: usize, max: usize) -> usize {
    max.saturating_sub(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_from_name() {
        assert!(MediaFile::new("beach.mp4", vec![]).is_video());
        assert!(MediaFile::new("beach.JPG", vec![]).is_image());
        assert_eq!(
            MediaFile::new("notes", vec![]).content_type,
            "application/octet-stream"
        );
    }

    #[test]
    fn test_extension() {
        assert_eq!(MediaFile::new("a.b.webm", vec![]).extension(), Some("webm"));
        assert_eq!(MediaFile::new("README", vec![]).extension(), None);
    }

    #[test]
    fn test_video_limits() {
        let limits = MediaLimits {
            max_video_bytes: 4,
            ..Default::default()
        };
        assert!(limits.check_video(&MediaFile::new("a.mp4", vec![0; 4])).is_ok());

        let err = limits
            .check_video(&MediaFile::new("a.mp4", vec![0; 5]))
            .unwrap_err();
        assert!(err.to_string().contains("exceeds"));

        let err = limits
            .check_video(&MediaFile::new("a.png", vec![0; 1]))
            .unwrap_err();
        assert!(err.to_string().contains("not a video file"));
    }

    #[test]
    fn test_defaults_and_slots() {
        let limits = MediaLimits::default();
        assert_eq!(limits.max_images, 4);
        assert_eq!(limits.max_package_videos, 6);
        assert_eq!(limits.max_moment_videos, 7);
        assert_eq!(limits.max_video_bytes, 60 * 1024 * 1024);
        assert_eq!(remaining_slots(5, 7), 2);
        assert_eq!(remaining_slots(9, 7), 0);
    }

    #[tokio::test]
    async fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sunset.png");
        std::fs::write(&path, b"png").unwrap();
        let file = MediaFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "sunset.png");
        assert_eq!(file.content_type, "image/png");
        assert_eq!(file.size(), 3);
    }
}
