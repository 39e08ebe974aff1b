//! tablegate - a thin REST gateway for a hosted table + file-storage backend
//!
//! Translates simple `/api/db/{action}/{table}` requests into the backend's
//! comparison-operator filter syntax, implements patch semantics on top of
//! the backend's replace-only update verb, and wraps every response in a
//! uniform `{code, data, message}` envelope.

pub mod backend;
pub mod cli;
pub mod config;
pub mod filter;
pub mod http_server;
pub mod storage;
