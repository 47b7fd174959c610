//! Storage layer for voyage
//!
//! This crate provides:
//! - The data client and object store contracts the engine is written against
//! - A local SQLite data store and filesystem bucket implementing them
//! - The device-local preference store

pub mod blob;
pub mod bucket;
pub mod client;
pub mod db;
pub mod error;
pub mod preferences;

pub use blob::BlobBucket;
pub use bucket::{ObjectStore, StoredObject};
pub use client::{DataClient, Order, Query};
pub use db::{GENERATE_UNIQUE_SLUG, LocalStore};
pub use error::{Result, StorageError};
pub use preferences::{FilePreferences, MemoryPreferences, PreferenceStore};
