//! Client for the upstream node service.
//!
//! `NodeClient` performs authenticated GETs against the node API. It logs in
//! on demand, keeps the resulting session in a `SessionStore`, and re-logs in
//! once when the node rejects a request with 401.

pub mod client;
pub mod error;

pub use client::NodeClient;
pub use error::FetchError;
