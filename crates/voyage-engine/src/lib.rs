//! Data access and media management for voyage
//!
//! - [`PackageRepository`] / [`Catalog`]: package CRUD with a cached listing
//! - [`MediaUploader`]: bucket uploads and deletes
//! - [`MomentLibrary`]: device-local travel moment videos
//! - [`AdminSession`]: the admin login flag
//!
//! Operations report through a [`Notifier`] and return sentinels instead
//! of errors.

pub mod catalog;
pub mod moments;
pub mod notify;
pub mod repository;
pub mod session;
pub mod uploader;

#[cfg(test)]
mod testing;

pub use catalog::Catalog;
pub use moments::MomentLibrary;
pub use notify::{Level, Notification, Notifier, RecordingNotifier};
pub use repository::PackageRepository;
pub use session::{AdminSession, CredentialVerifier, LoginError};
pub use uploader::MediaUploader;
