//! Core domain models for voyage
//!
//! This crate contains:
//! - Domain models (Package, Video, TravelMomentVideo, Collection)
//! - Row normalization at the data-store boundary
//! - Slug shape, video ordering and listing helpers
//! - Admin-side media rules

pub mod collection;
pub mod error;
pub mod listing;
pub mod media;
pub mod moment;
pub mod normalize;
pub mod package;
pub mod slug;
pub mod videos;

pub use collection::Collection;
pub use error::{Error, Result};
pub use media::{MediaFile, MediaLimits};
pub use moment::{MomentPatch, TravelMomentVideo};
pub use normalize::{Row, normalize_row, to_row};
pub use package::{
    ItineraryDay, NewPackage, Package, PackagePatch, PackageStatus, Video, VideoSource,
};
