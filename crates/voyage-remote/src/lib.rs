//! Hosted backend client for voyage
//!
//! Implements the `voyage-storage` contracts against the hosted service's
//! REST dialect: tables under `/rest/v1`, functions under `/rest/v1/rpc`,
//! objects under `/storage/v1/object`, password sign-in under `/auth/v1`.

pub mod auth;
pub mod http;
pub mod rest;
pub mod storage;

pub use auth::RestAuth;
pub use rest::RestClient;
pub use storage::RestBucket;
