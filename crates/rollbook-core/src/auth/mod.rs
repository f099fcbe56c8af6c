//! Authentication against the upstream node service.
//!
//! This module provides:
//! - `Credentials`: the login identity and secret read from configuration
//! - `Session` / `SessionStore`: the current upstream session and its validity rules
//! - `Authenticator`: the login exchange that produces a new `Session`
//!
//! The node service may answer a login with a bearer token or with a
//! cookie; both styles end up as a `Session`.

pub mod credentials;
pub mod error;
pub mod login;
pub mod session;

pub use credentials::Credentials;
pub use error::AuthError;
pub use login::Authenticator;
pub use session::{Session, SessionStore};
