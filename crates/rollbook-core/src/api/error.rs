use thiserror::Error;

use crate::auth::AuthError;
use crate::utils::truncate_body;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Unauthorized - request rejected again after re-login")]
    Unauthorized,

    #[error("Backend returned {status}: {body}")]
    BackendStatus { status: u16, body: String },

    #[error("Request to node service timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Transport(reqwest::Error),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Invalid resource path: {0}")]
    InvalidPath(String),
}

impl FetchError {
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 => FetchError::Unauthorized,
            code => FetchError::BackendStatus {
                status: code,
                body: truncate_body(body),
            },
        }
    }

    /// Whether the failure came from the node rejecting our credentials
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, FetchError::Auth(_) | FetchError::Unauthorized)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Transport(e)
        }
    }
}
