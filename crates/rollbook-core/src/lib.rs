//! Core library for rollbook.
//!
//! Provides the authenticated client for the upstream node service, the
//! session handling it relies on, the `Student` model and the PDF report
//! renderer. The HTTP surface lives in `rollbook-server`.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod report;
pub mod utils;

pub use api::{FetchError, NodeClient};
pub use auth::{AuthError, Authenticator, Credentials, Session, SessionStore};
pub use config::{Config, ConfigError, NodeConfig};
pub use models::Student;
pub use report::{PdfReportRenderer, RenderError, ReportRenderer};
