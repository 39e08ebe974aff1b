//! # File Storage
//!
//! Thin forwarder to the backend's object-store HTTP API.

pub mod client;
pub mod errors;

pub use client::{object_name, ObjectStore, StorageClient};
pub use errors::{StorageError, StorageResult};
