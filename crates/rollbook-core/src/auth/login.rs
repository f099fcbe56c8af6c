use chrono::{DateTime, Duration, Utc};
use reqwest::{header, Client};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::credentials::Credentials;
use super::error::AuthError;
use super::session::{Session, DEFAULT_SESSION_MINUTES};

/// Login endpoint, relative to the node base URL
const LOGIN_PATH: &str = "/auth/login";

#[derive(Debug, Default, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
    /// Expiry as unix epoch seconds
    #[serde(default)]
    exp: Option<i64>,
}

/// Exchanges credentials for a `Session` at the node's login endpoint.
///
/// Failures are reported to the caller as-is; retry policy belongs to the
/// fetcher.
#[derive(Clone)]
pub struct Authenticator {
    client: Client,
    login_url: String,
    require_session_cookie: bool,
}

impl Authenticator {
    pub fn new(client: Client, base_url: &str, require_session_cookie: bool) -> Self {
        Self {
            client,
            login_url: format!("{}{}", base_url.trim_end_matches('/'), LOGIN_PATH),
            require_session_cookie,
        }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        debug!(url = %self.login_url, identity = credentials.identity(), "Logging in to node service");

        let response = self
            .client
            .post(&self.login_url)
            .header(header::ACCEPT, "application/json")
            .json(&credentials.login_request())
            .send()
            .await?;

        let status = response.status();
        let cookie_set = response.headers().contains_key(header::SET_COOKIE);
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Node login rejected");
            return Err(AuthError::rejected(status, &body));
        }

        let session = self.parse_login_body(&body, cookie_set, Utc::now())?;
        info!(
            cookie_backed = session.cookie_backed,
            minutes_until_expiry = session.minutes_until_expiry(),
            "Node login succeeded"
        );
        Ok(session)
    }

    /// Turn a successful login body into a session.
    ///
    /// A body with a token gives a bearer session. Anything else, including a
    /// body that is not JSON at all, is treated as a cookie login.
    pub fn parse_login_body(
        &self,
        body: &str,
        cookie_set: bool,
        now: DateTime<Utc>,
    ) -> Result<Session, AuthError> {
        let default_expiry = now + Duration::minutes(DEFAULT_SESSION_MINUTES);
        let parsed: LoginResponse = serde_json::from_str(body).unwrap_or_default();

        if let Some(token) = parsed.token.filter(|t| !t.is_empty()) {
            let expires_at = parsed
                .exp
                .filter(|exp| *exp > 0)
                .and_then(|exp| DateTime::from_timestamp(exp, 0))
                .unwrap_or(default_expiry);
            return Ok(Session::bearer(token, expires_at));
        }

        if self.require_session_cookie && !cookie_set {
            warn!("Login succeeded without a token or a session cookie");
            return Err(AuthError::MissingSessionCookie);
        }

        Ok(Session::cookie(default_expiry))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, header as header_eq, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn authenticator(require_cookie: bool) -> Authenticator {
        Authenticator::new(Client::new(), "http://up", require_cookie)
    }

    #[test]
    fn test_login_url_joins_base() {
        let auth = Authenticator::new(Client::new(), "http://up/", true);
        assert_eq!(auth.login_url, "http://up/auth/login");
    }

    #[test]
    fn test_token_with_expiry() {
        let now = Utc::now();
        let exp = now.timestamp() + 7200;
        let body = format!(r#"{{"token":"abc","exp":{exp}}}"#);

        let session = authenticator(true).parse_login_body(&body, false, now).unwrap();
        assert_eq!(session.token(), Some("abc"));
        assert_eq!(session.expires_at, DateTime::from_timestamp(exp, 0));
        assert!(!session.cookie_backed);
    }

    #[test]
    fn test_token_without_expiry_defaults_to_an_hour() {
        let now = Utc::now();
        let session = authenticator(true)
            .parse_login_body(r#"{"token":"abc"}"#, false, now)
            .unwrap();
        assert_eq!(session.expires_at, Some(now + Duration::minutes(60)));

        let session = authenticator(true)
            .parse_login_body(r#"{"token":"abc","exp":0}"#, false, now)
            .unwrap();
        assert_eq!(session.expires_at, Some(now + Duration::minutes(60)));
    }

    #[test]
    fn test_tokenless_body_is_cookie_session() {
        let now = Utc::now();
        for body in [r#"{"ok":true}"#, r#"{"token":""}"#, "not json", ""] {
            let session = authenticator(true).parse_login_body(body, true, now).unwrap();
            assert!(session.cookie_backed);
            assert_eq!(session.token(), None);
            assert_eq!(session.expires_at, Some(now + Duration::minutes(60)));
        }
    }

    #[test]
    fn test_tokenless_body_without_cookie() {
        let now = Utc::now();
        let err = authenticator(true)
            .parse_login_body(r#"{"ok":true}"#, false, now)
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingSessionCookie));

        // Lenient mode trusts the transport to hold the session.
        let session = authenticator(false)
            .parse_login_body(r#"{"ok":true}"#, false, now)
            .unwrap();
        assert!(session.cookie_backed);
    }

    #[tokio::test]
    async fn test_login_posts_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(header_eq("content-type", "application/json"))
            .and(body_json(serde_json::json!({"username": "ann@school.test", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "t1"})))
            .expect(1)
            .mount(&server)
            .await;

        let auth = Authenticator::new(Client::new(), &server.uri(), true);
        let session = auth.login(&Credentials::new("ann@school.test", "pw")).await.unwrap();
        assert_eq!(session.token(), Some("t1"));
    }

    #[tokio::test]
    async fn test_login_cookie_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "sid=abc; Path=/")
                    .set_body_json(serde_json::json!({"message": "logged in"})),
            )
            .mount(&server)
            .await;

        let auth = Authenticator::new(Client::new(), &server.uri(), true);
        let session = auth.login(&Credentials::new("ann", "pw")).await.unwrap();
        assert!(session.cookie_backed);
        assert!(session.token().is_none());
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
            .expect(1)
            .mount(&server)
            .await;

        let auth = Authenticator::new(Client::new(), &server.uri(), true);
        let err = auth.login(&Credentials::new("ann", "wrong")).await.unwrap_err();
        match err {
            AuthError::Rejected { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid credentials");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
