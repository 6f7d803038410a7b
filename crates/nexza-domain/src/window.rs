//! Time windows shared by the code issuer and the session gate.
//!
//! Every window is half-open on the far side: an instant equal to the end is
//! still inside, anything strictly later has elapsed.

use chrono::{DateTime, Duration, Utc};

/// Verification code lifetime in seconds.
pub const CODE_TTL_SECS: i64 = 60;

/// Delay before the client offers "resend code" again, in seconds.
/// Client affordance only; issuance itself is not throttled.
pub const RESEND_COOLDOWN_SECS: i64 = 300;

/// Session ceiling for sessions started on a mobile device, in seconds (30 min).
pub const MOBILE_SESSION_MAX_SECS: i64 = 30 * 60;

/// Interval at which clients re-check the mobile session, in seconds.
pub const SESSION_CHECK_INTERVAL_SECS: u64 = 60;

/// A span of time starting at `start` and lasting `length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub length: Duration,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, length: Duration) -> Self {
        Self { start, length }
    }

    pub fn seconds(start: DateTime<Utc>, secs: i64) -> Self {
        Self::new(start, Duration::seconds(secs))
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.start + self.length
    }

    pub fn has_elapsed(&self, now: DateTime<Utc>) -> bool {
        now > self.end()
    }

    /// Time left before the window elapses, floored at zero.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.end() - now).max(Duration::zero())
    }
}

/// Window during which a freshly issued code is accepted.
pub fn code_window(issued_at: DateTime<Utc>) -> TimeWindow {
    TimeWindow::seconds(issued_at, CODE_TTL_SECS)
}

/// Window after which the client may offer a resend.
pub fn resend_window(issued_at: DateTime<Utc>) -> TimeWindow {
    TimeWindow::seconds(issued_at, RESEND_COOLDOWN_SECS)
}

/// Outcome of the periodic mobile session check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCheck {
    /// Session may continue; `remaining` is informational.
    Active { remaining: Option<Duration> },
    /// Ceiling passed: sign out and redirect with the expiry marker.
    Expired,
}

/// Apply the mobile session ceiling. Desktop sessions are never expired here;
/// their lifetime is bounded by the session token itself.
pub fn check_session(started_at: DateTime<Utc>, mobile: bool, now: DateTime<Utc>) -> SessionCheck {
    if !mobile {
        return SessionCheck::Active { remaining: None };
    }
    let window = TimeWindow::seconds(started_at, MOBILE_SESSION_MAX_SECS);
    if window.has_elapsed(now) {
        SessionCheck::Expired
    } else {
        SessionCheck::Active {
            remaining: Some(window.remaining(now)),
        }
    }
}
