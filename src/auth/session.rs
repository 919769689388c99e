//! Session handling
//!
//! The session is opaque to this crate: it carries the provider's access
//! token and the identity the provider reported for it. The token travels in
//! an HTTP-only cookie managed through [`CookieJar`].

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cookie holding the provider access token
pub const SESSION_COOKIE: &str = "cw-access-token";

/// Session issued by the auth provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user_id: String,
    pub email: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(
        access_token: impl Into<String>,
        user_id: impl Into<String>,
        email: Option<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            user_id: user_id.into(),
            email,
            expires_at: None,
        }
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

/// Access token from the request's cookie jar
pub fn token_from_jar(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// Cookie storing the token
pub fn session_cookie(token: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(secure)
        .build()
}

/// Jar with the session cookie expired
pub fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue};

    fn jar_with(cookie_header: &'static str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static(cookie_header));
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn test_token_from_cookie_header() {
        let jar = jar_with("theme=dark; cw-access-token=abc.def; other=1");
        assert_eq!(token_from_jar(&jar).as_deref(), Some("abc.def"));
    }

    #[test]
    fn test_missing_or_empty_cookie() {
        assert!(token_from_jar(&CookieJar::new()).is_none());
        assert!(token_from_jar(&jar_with("theme=dark")).is_none());
        assert!(token_from_jar(&jar_with("cw-access-token=")).is_none());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("eyJhbGciOi.payload.sig", true);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.secure(), Some(true));

        let jar = CookieJar::new().add(cookie);
        assert_eq!(token_from_jar(&jar).as_deref(), Some("eyJhbGciOi.payload.sig"));
    }

    #[test]
    fn test_clear_session_drops_token() {
        let jar = clear_session(jar_with("cw-access-token=abc"));
        assert!(token_from_jar(&jar).is_none());
    }
}
