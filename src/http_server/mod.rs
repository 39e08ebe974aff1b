//! # Gateway HTTP Layer
//!
//! Route dispatch, response enveloping and the error taxonomy.

pub mod db_routes;
pub mod errors;
pub mod file_routes;
pub mod response;
pub mod server;

pub use errors::{ApiError, ApiResult};
pub use response::Envelope;
pub use server::{AppState, HttpServer};
