use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;

use nexza_core::error::json_error;
use nexza_domain::username::InvalidUsername;
use nexza_session_types::cookie::clear_session_cookie;

/// Entry page every signed-out redirect lands on.
pub const ENTRY_PAGE: &str = "/index.html";

/// Verification code rejections, in the order validation checks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CodeError {
    #[error("Code not found or expired")]
    NotFound,
    #[error("Code has expired")]
    Expired,
    #[error("Invalid code")]
    Mismatch,
    #[error("Code already used")]
    AlreadyConsumed,
}

impl CodeError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound => "CODE_NOT_FOUND",
            Self::Expired => "CODE_EXPIRED",
            Self::Mismatch => "CODE_MISMATCH",
            Self::AlreadyConsumed => "CODE_ALREADY_CONSUMED",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Expired => StatusCode::GONE,
            Self::Mismatch => StatusCode::BAD_REQUEST,
            Self::AlreadyConsumed => StatusCode::CONFLICT,
        }
    }
}

/// Gate outcomes that stop a request before the handler body runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("Please sign in to continue")]
    Unauthenticated,
    #[error("Your session has expired. Please sign in again.")]
    SessionExpired,
    #[error("Your account has been banned. Please contact support.")]
    Banned,
    #[error("Access denied. Admin privileges required.")]
    NotAdmin,
}

impl AccessError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::Banned => "BANNED",
            Self::NotAdmin => "ACCESS_DENIED",
        }
    }

    /// Redirect target for outcomes that end the session. `None` for
    /// `NotAdmin`, which keeps the session and answers 403.
    pub fn location(&self) -> Option<&'static str> {
        match self {
            Self::Unauthenticated => Some(ENTRY_PAGE),
            Self::SessionExpired => Some("/index.html?expired=1"),
            Self::Banned => Some("/index.html?banned=1"),
            Self::NotAdmin => None,
        }
    }

    pub fn signs_out(&self) -> bool {
        self.location().is_some()
    }
}

/// Identity provider failures, carrying the message shown on the entry page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("An account with this email already exists")]
    EmailInUse,
    #[error("Password is too weak")]
    WeakPassword,
    #[error("No account found with this email")]
    AccountNotFound,
    #[error("Incorrect password")]
    WrongPassword,
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Network error. Please check your connection")]
    Network,
    #[error("Identity provider API key is not valid")]
    InvalidApiKey,
    #[error("{0}")]
    Provider(String),
}

impl AuthError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmailInUse => "EMAIL_IN_USE",
            Self::WeakPassword => "WEAK_PASSWORD",
            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",
            Self::WrongPassword => "WRONG_PASSWORD",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::Network => "NETWORK_FAILURE",
            Self::InvalidApiKey => "PROVIDER_MISCONFIGURED",
            Self::Provider(_) => "PROVIDER_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::EmailInUse => StatusCode::CONFLICT,
            Self::WeakPassword | Self::InvalidEmail => StatusCode::BAD_REQUEST,
            Self::AccountNotFound | Self::WrongPassword => StatusCode::UNAUTHORIZED,
            Self::Network | Self::InvalidApiKey | Self::Provider(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Console service error variants.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Code(#[from] CodeError),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{0}")]
    InvalidInput(String),
    #[error("username must be exactly 6 digits")]
    InvalidUsername,
    #[error("username is already taken")]
    UsernameTaken,
    #[error("username cannot be changed once set")]
    UsernameImmutable,
    #[error("user not found")]
    UserNotFound,
    #[error("message not found")]
    MessageNotFound,
    #[error("announcement not found")]
    AnnouncementNotFound,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl From<InvalidUsername> for ConsoleError {
    fn from(_: InvalidUsername) -> Self {
        Self::InvalidUsername
    }
}

impl ConsoleError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Code(e) => e.kind(),
            Self::Access(e) => e.kind(),
            Self::Auth(e) => e.kind(),
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::UsernameImmutable => "USERNAME_IMMUTABLE",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::MessageNotFound => "MESSAGE_NOT_FOUND",
            Self::AnnouncementNotFound => "ANNOUNCEMENT_NOT_FOUND",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for ConsoleError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Code(e) => e.status(),
            Self::Access(e) => {
                if let Some(location) = e.location() {
                    return redirect(location, e.kind(), e.to_string());
                }
                StatusCode::FORBIDDEN
            }
            Self::Auth(e) => e.status(),
            Self::InvalidInput(_) | Self::InvalidUsername => StatusCode::BAD_REQUEST,
            Self::UsernameTaken | Self::UsernameImmutable => StatusCode::CONFLICT,
            Self::UserNotFound | Self::MessageNotFound | Self::AnnouncementNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // TraceLayer already records every status; only 500s need the anyhow chain.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %format!("{e:#}"), kind = "INTERNAL", "internal error");
        }
        json_error(status, self.kind(), self.to_string())
    }
}

fn redirect(location: &'static str, kind: &str, message: String) -> Response {
    let mut resp = json_error(StatusCode::SEE_OTHER, kind, message);
    resp.headers_mut()
        .insert(header::LOCATION, HeaderValue::from_static(location));
    resp
}

/// Rejection produced by the session extractors. Outcomes that end the
/// session also clear the session cookie.
#[derive(Debug)]
pub struct GateRejection {
    pub error: ConsoleError,
    pub cookie_domain: String,
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        let signs_out = matches!(&self.error, ConsoleError::Access(e) if e.signs_out());
        if signs_out {
            let jar = clear_session_cookie(CookieJar::new(), self.cookie_domain);
            (jar, self.error.into_response()).into_response()
        } else {
            self.error.into_response()
        }
    }
}
