use std::fmt;

use serde::Serialize;

/// Login identity and secret for the node service.
///
/// Read once at startup and never mutated. `Debug` redacts the secret so the
/// struct can travel through config logging safely.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    identity: String,
    secret: String,
}

/// Wire shape of `POST /auth/login`.
#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl Credentials {
    pub fn new(identity: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            secret: secret.into(),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub(crate) fn login_request(&self) -> LoginRequest<'_> {
        LoginRequest {
            username: &self.identity,
            password: &self.secret,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("secret", &"<redacted>")
            .finish()
    }
}
