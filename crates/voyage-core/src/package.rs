//! Package domain model

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Rating shown when a package has none recorded
pub const DEFAULT_RATING: f64 = 4.5;

/// A travel or discovery package as stored remotely
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub price: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub travel_period: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<i64>,
    pub status: PackageStatus,
    pub images: Vec<String>,
    pub videos: Vec<Video>,
    pub highlights: Vec<String>,
    pub inclusions: Vec<String>,
    pub exclusions: Vec<String>,
    pub itinerary: Vec<ItineraryDay>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Package {
    pub fn is_published(&self) -> bool {
        self.status == PackageStatus::Published
    }

    pub fn display_rating(&self) -> f64 {
        self.rating.unwrap_or(DEFAULT_RATING)
    }

    pub fn display_review_count(&self) -> i64 {
        self.review_count.unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageStatus {
    #[default]
    Draft,
    Published,
}

impl PackageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PackageStatus::Draft => "draft",
            PackageStatus::Published => "published",
        }
    }

    /// Lenient parse: anything other than "published" is a draft
    pub fn from_loose(s: &str) -> Self {
        if s.eq_ignore_ascii_case("published") {
            PackageStatus::Published
        } else {
            PackageStatus::Draft
        }
    }
}

impl std::fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A video attached to a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    #[serde(rename = "type")]
    pub source: VideoSource,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub order: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoSource {
    /// Stored in our own bucket
    Upload,
    /// External link (YouTube, Vimeo, ...)
    Url,
}

impl Video {
    /// Video hosted on an external site
    pub fn link(url: impl Into<String>, title: Option<String>, description: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source: VideoSource::Url,
            url: url.into(),
            title,
            description,
            order: 0,
        }
    }

    /// Video uploaded to the media bucket
    pub fn uploaded(url: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source: VideoSource::Upload,
            url: url.into(),
            title: None,
            description: None,
            order: 0,
        }
    }

    /// Label for the hosting provider, used by admin listings
    pub fn provider(&self) -> &'static str {
        match self.source {
            VideoSource::Upload => "Uploaded Video",
            VideoSource::Url if self.url.contains("youtube.com") || self.url.contains("youtu.be") => {
                "YouTube"
            }
            VideoSource::Url if self.url.contains("vimeo.com") => "Vimeo",
            VideoSource::Url => "External URL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItineraryDay {
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub activity: String,
    #[serde(default)]
    pub accommodation: String,
}

/// Fields supplied by an admin when creating a package.
///
/// The slug is not part of this: it is resolved by the store from `title`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPackage {
    pub title: String,
    pub price: String,
    pub duration: Option<String>,
    pub travel_period: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<i64>,
    #[serde(default)]
    pub status: PackageStatus,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub videos: Vec<Video>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub inclusions: Vec<String>,
    #[serde(default)]
    pub exclusions: Vec<String>,
    #[serde(default)]
    pub itinerary: Vec<ItineraryDay>,
}

impl NewPackage {
    pub fn new(title: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            price: price.into(),
            ..Default::default()
        }
    }
}

/// Partial update. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackagePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PackageStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<Video>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inclusions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub itinerary: Option<Vec<ItineraryDay>>,
}

impl PackagePatch {
    pub fn status(status: PackageStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn images(images: Vec<String>) -> Self {
        Self {
            images: Some(images),
            ..Default::default()
        }
    }

    pub fn videos(videos: Vec<Video>) -> Self {
        Self {
            videos: Some(videos),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_defaults() {
        let json = serde_json::json!({
            "id": "p1",
            "title": "Zanzibar",
            "slug": "zanzibar",
            "price": "R45,999 PPS",
            "status": "draft",
            "images": [], "videos": [], "highlights": [],
            "inclusions": [], "exclusions": [], "itinerary": [],
            "created_at": "2025-01-01T10:00:00Z",
            "updated_at": "2025-01-01T10:00:00Z"
        });
        let pkg: Package = serde_json::from_value(json).unwrap();
        assert_eq!(pkg.display_rating(), DEFAULT_RATING);
        assert_eq!(pkg.display_review_count(), 0);
        assert!(!pkg.is_published());
    }

    #[test]
    fn test_video_wire_shape() {
        let video = Video::link("https://youtu.be/abc", Some("Beach".into()), None);
        let value = serde_json::to_value(&video).unwrap();
        assert_eq!(value["type"], "url");
        assert_eq!(value["order"], 0);
        assert!(value.get("description").is_none());
        assert_eq!(video.provider(), "YouTube");
        assert_eq!(Video::uploaded("https://cdn/x.mp4").provider(), "Uploaded Video");
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = PackagePatch::status(PackageStatus::Published);
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({ "status": "published" }));
        assert!(PackagePatch::default().is_empty());
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_loose_status() {
        assert_eq!(PackageStatus::from_loose("Published"), PackageStatus::Published);
        assert_eq!(PackageStatus::from_loose("archived"), PackageStatus::Draft);
    }
}
