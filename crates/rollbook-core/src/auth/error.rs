use std::sync::Arc;

use thiserror::Error;

use crate::utils::truncate_body;

/// Cloneable so one failed login can be handed to every caller that waited on it.
#[derive(Error, Debug, Clone)]
pub enum AuthError {
    #[error("Login rejected ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Login response carried neither a token nor a session cookie")]
    MissingSessionCookie,

    #[error("Login request timed out")]
    Timeout,

    #[error("Login request failed: {0}")]
    Transport(Arc<reqwest::Error>),
}

impl AuthError {
    pub fn rejected(status: reqwest::StatusCode, body: &str) -> Self {
        AuthError::Rejected {
            status: status.as_u16(),
            body: truncate_body(body),
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AuthError::Timeout
        } else {
            AuthError::Transport(Arc::new(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_display() {
        let err = AuthError::rejected(reqwest::StatusCode::FORBIDDEN, "bad password");
        assert_eq!(err.to_string(), "Login rejected (403): bad password");
    }

    #[test]
    fn test_rejected_truncates_body() {
        let body = "x".repeat(2000);
        match AuthError::rejected(reqwest::StatusCode::BAD_REQUEST, &body) {
            AuthError::Rejected { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("truncated, 2000 total bytes"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
