//! # Table Backend
//!
//! The data-access layer: a narrow CRUD trait over the hosted backend's
//! REST endpoint, plus the read-merge-serialize logic that gives updates
//! patch semantics.

pub mod client;
pub mod errors;
pub mod memory;
pub mod merge;

pub use client::{RestBackend, TableBackend};
pub use errors::{BackendError, BackendResult};
pub use memory::InMemoryBackend;
pub use merge::merge_update;
