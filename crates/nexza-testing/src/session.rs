//! Pre-signed session cookies for router tests.
//!
//! Protected routes resolve identity from the `nexza_session` cookie. In
//! tests, `MockSession` signs that cookie directly so no identity provider
//! round trip is needed.

use chrono::{DateTime, Utc};
use http::{HeaderValue, header::COOKIE};

use nexza_domain::id::IdentityId;
use nexza_session_types::cookie::NEXZA_SESSION;
use nexza_session_types::token::issue_session_token;

/// Signing secret shared by test states and `MockSession`.
pub const TEST_SESSION_SECRET: &str = "test-session-secret-for-unit-tests-only";

/// Configurable identity injected into test requests.
pub struct MockSession {
    pub identity_id: IdentityId,
    pub email: String,
    pub mobile: bool,
    pub started_at: DateTime<Utc>,
}

impl MockSession {
    pub fn new(identity_id: impl Into<IdentityId>, email: &str) -> Self {
        Self {
            identity_id: identity_id.into(),
            email: email.to_owned(),
            mobile: false,
            started_at: Utc::now(),
        }
    }

    pub fn mobile(mut self, started_at: DateTime<Utc>) -> Self {
        self.mobile = true;
        self.started_at = started_at;
        self
    }

    /// Signed token value, as stored in the cookie.
    pub fn token(&self) -> String {
        issue_session_token(
            &self.identity_id,
            &self.email,
            self.mobile,
            self.started_at,
            TEST_SESSION_SECRET,
        )
        .map(|(token, _)| token)
        .unwrap()
    }

    /// `(Cookie, "nexza_session=<token>")` header pair.
    pub fn cookie_header(&self) -> (http::HeaderName, HeaderValue) {
        let value = format!("{NEXZA_SESSION}={}", self.token());
        (COOKIE, HeaderValue::from_str(&value).unwrap())
    }
}
