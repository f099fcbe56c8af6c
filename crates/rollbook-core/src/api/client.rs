//! Authenticated client for the node REST API.
//!
//! Every fetch follows the same path: make sure a valid session exists,
//! send the GET, and if the node answers 401, log in again and send it one
//! more time. A second 401 is final.

use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::auth::{AuthError, Authenticator, Credentials, Session, SessionStore};
use crate::config::NodeConfig;
use crate::models::Student;

use super::FetchError;

/// Client for the node service.
///
/// Built once by the composition root and shared behind an `Arc`. The
/// underlying `reqwest::Client` keeps the cookie jar used by cookie-backed
/// sessions.
pub struct NodeClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
    authenticator: Authenticator,
    sessions: SessionStore,
    /// Admits one login at a time and keeps the failure of the last one.
    /// Never taken by callers whose session is valid.
    refresh_gate: Mutex<Option<AuthError>>,
    /// Number of completed logins, successful or not.
    logins_completed: AtomicU64,
}

impl NodeClient {
    pub fn new(config: NodeConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .build()?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        let authenticator =
            Authenticator::new(client.clone(), &base_url, config.require_session_cookie);

        Ok(Self {
            client,
            base_url,
            credentials: config.credentials,
            authenticator,
            sessions: SessionStore::new(),
            refresh_gate: Mutex::new(None),
            logins_completed: AtomicU64::new(0),
        })
    }

    pub fn session_store(&self) -> &SessionStore {
        &self.sessions
    }

    /// Fetch a student record by id
    pub async fn get_student(&self, id: &str) -> Result<Student, FetchError> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| !c.is_whitespace() && !matches!(c, '/' | '?' | '#' | '%'));
        if !valid {
            return Err(FetchError::InvalidPath(id.to_string()));
        }
        self.fetch(&format!("/students/{}", id)).await
    }

    /// GET `path` relative to the base URL and decode the JSON body.
    pub async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = self.url_for(path)?;

        let (session, generation) = self.ensure_session().await?;
        let response = self.send(&url, &session).await?;

        let response = if response.status() == StatusCode::UNAUTHORIZED {
            warn!(path = path, "Node rejected session, logging in again");
            let (session, _) = self.refresh(generation).await?;
            let retry = self.send(&url, &session).await?;
            if retry.status() == StatusCode::UNAUTHORIZED {
                warn!(path = path, "Node rejected request after re-login");
                return Err(FetchError::Unauthorized);
            }
            retry
        } else {
            response
        };

        Self::decode(path, response).await
    }

    fn url_for(&self, path: &str) -> Result<String, FetchError> {
        if path.contains("://") {
            return Err(FetchError::InvalidPath(path.to_string()));
        }
        Ok(format!("{}/{}", self.base_url, path.trim_start_matches('/')))
    }

    /// Return the current session, logging in first if it is stale.
    async fn ensure_session(&self) -> Result<(Session, u64), AuthError> {
        let (session, generation) = self.sessions.snapshot();
        if session.is_valid() {
            return Ok((session, generation));
        }
        debug!(generation, "Session stale, refreshing");
        self.refresh(generation).await
    }

    /// Replace the session seen at `stale_generation` with a fresh one.
    ///
    /// Callers that queued behind another caller's login share its outcome:
    /// they pick up the new session, or return the same error, instead of
    /// logging in again.
    async fn refresh(&self, stale_generation: u64) -> Result<(Session, u64), AuthError> {
        let seen_logins = self.logins_completed.load(Ordering::Acquire);
        let mut last_failure = self.refresh_gate.lock().await;

        let (current, generation) = self.sessions.snapshot();
        if generation != stale_generation && current.is_valid() {
            debug!(generation, "Reusing session refreshed by another request");
            return Ok((current, generation));
        }
        if self.logins_completed.load(Ordering::Acquire) != seen_logins {
            if let Some(err) = last_failure.as_ref() {
                debug!(error = %err, "Reusing failure of the login this request waited on");
                return Err(err.clone());
            }
        }

        let result = self.authenticator.login(&self.credentials).await;
        // Bumped only once the login is over, so every caller that arrived
        // while it was in flight sees the change.
        self.logins_completed.fetch_add(1, Ordering::Release);

        match result {
            Ok(session) => {
                *last_failure = None;
                let generation = self.sessions.replace(session.clone());
                Ok((session, generation))
            }
            Err(err) => {
                *last_failure = Some(err.clone());
                Err(err)
            }
        }
    }

    async fn send(&self, url: &str, session: &Session) -> Result<Response, FetchError> {
        let mut request = self.client.get(url);
        // Cookie-backed sessions ride on the client's cookie jar instead.
        if let Some(token) = session.token() {
            request = request.bearer_auth(token);
        }
        Ok(request.send().await?)
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, FetchError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(path = path, status = status.as_u16(), "Node returned an error status");
            return Err(FetchError::from_status(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| FetchError::Decode(format!("Failed to parse JSON response from {}: {}", path, e)))
    }
}
