use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};

/// Buffer before expiry at which a bearer session stops counting as valid (5 minutes).
const TOKEN_REFRESH_BUFFER_MINUTES: i64 = 5;

/// Lifetime assumed for a session when the login response gives no expiry.
/// Also used as the soft expiry of cookie-backed sessions to force a periodic re-login.
pub const DEFAULT_SESSION_MINUTES: i64 = 60;

/// Credential state for the node service.
///
/// A session with no token that is not cookie-backed is unauthenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub cookie_backed: bool,
}

impl Session {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn bearer(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: Some(token.into()),
            expires_at: Some(expires_at),
            cookie_backed: false,
        }
    }

    /// Session held by the HTTP client's cookie jar.
    pub fn cookie(expires_at: DateTime<Utc>) -> Self {
        Self {
            token: None,
            expires_at: Some(expires_at),
            cookie_backed: true,
        }
    }

    /// Get the bearer token, if any
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some() || self.cookie_backed
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Bearer sessions must outlive `now` by the refresh buffer; cookie
    /// sessions only need their soft expiry to lie in the future.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        let Some(expires_at) = self.expires_at else {
            return false;
        };
        if self.token().is_some() {
            expires_at - now > Duration::minutes(TOKEN_REFRESH_BUFFER_MINUTES)
        } else if self.cookie_backed {
            expires_at > now
        } else {
            false
        }
    }

    /// Get minutes remaining until expiry (for logging)
    pub fn minutes_until_expiry(&self) -> i64 {
        self.expires_at
            .map(|exp| (exp - Utc::now()).num_minutes().max(0))
            .unwrap_or(0)
    }
}

#[derive(Debug, Default)]
struct Slot {
    session: Session,
    generation: u64,
}

/// Single source of truth for the current session.
///
/// Reads and replacements are mutually exclusive; a reader always sees a whole
/// session. Every `replace` bumps a generation counter so callers can tell
/// whether the session changed since they last looked.
#[derive(Debug, Default)]
pub struct SessionStore {
    slot: RwLock<Slot>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.snapshot().0.is_valid()
    }

    /// Copy of the current session and its generation.
    pub fn snapshot(&self) -> (Session, u64) {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        (slot.session.clone(), slot.generation)
    }

    pub fn generation(&self) -> u64 {
        self.slot.read().unwrap_or_else(PoisonError::into_inner).generation
    }

    /// Swap in a new session, returning its generation.
    pub fn replace(&self, session: Session) -> u64 {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        slot.session = session;
        slot.generation += 1;
        slot.generation
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_bearer_validity_respects_buffer() {
        let now = Utc::now();
        assert!(Session::bearer("abc", now + Duration::minutes(6)).is_valid_at(now));
        assert!(Session::bearer("abc", now + Duration::hours(1)).is_valid_at(now));
        assert!(!Session::bearer("abc", now + Duration::minutes(5)).is_valid_at(now));
        assert!(!Session::bearer("abc", now + Duration::minutes(4)).is_valid_at(now));
        assert!(!Session::bearer("abc", now - Duration::minutes(1)).is_valid_at(now));
    }

    #[test]
    fn test_empty_token_is_unauthenticated() {
        let now = Utc::now();
        let session = Session::bearer("", now + Duration::hours(1));
        assert!(!session.is_authenticated());
        assert!(!session.is_valid_at(now));
        assert!(!Session::empty().is_valid_at(now));
    }

    #[test]
    fn test_cookie_validity() {
        let now = Utc::now();
        let session = Session::cookie(now + Duration::minutes(DEFAULT_SESSION_MINUTES));
        assert!(session.is_authenticated());
        assert!(session.token().is_none());
        assert!(session.is_valid_at(now));
        assert!(session.is_valid_at(now + Duration::minutes(59)));
        assert!(!session.is_valid_at(now + Duration::minutes(61)));
    }

    #[test]
    fn test_minutes_until_expiry() {
        let session = Session::bearer("abc", Utc::now() + Duration::minutes(30) + Duration::seconds(30));
        assert_eq!(session.minutes_until_expiry(), 30);
        assert_eq!(Session::empty().minutes_until_expiry(), 0);
    }

    #[test]
    fn test_store_replace_bumps_generation() {
        let store = SessionStore::new();
        assert!(!store.is_valid());
        assert_eq!(store.generation(), 0);

        let session = Session::bearer("t1", Utc::now() + Duration::hours(1));
        assert_eq!(store.replace(session.clone()), 1);
        assert!(store.is_valid());
        assert_eq!(store.snapshot(), (session, 1));
    }

    #[test]
    fn test_store_readers_see_whole_sessions() {
        let store = Arc::new(SessionStore::new());
        let expires = Utc::now() + Duration::hours(1);

        let writers: Vec<_> = (0..4)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for n in 0..200 {
                        if (i + n) % 2 == 0 {
                            store.replace(Session::bearer(format!("t{n}"), expires));
                        } else {
                            store.replace(Session::cookie(expires));
                        }
                    }
                })
            })
            .collect();

        for _ in 0..500 {
            let (session, _) = store.snapshot();
            // Never a token on a cookie session, never a cookie flag on a bearer one.
            assert!(!(session.cookie_backed && session.token.is_some()));
        }

        for w in writers {
            w.join().unwrap();
        }
        assert_eq!(store.generation(), 800);
    }
}
