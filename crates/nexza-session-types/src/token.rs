//! Signed session tokens.

use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use nexza_domain::id::IdentityId;

/// Session token lifetime in seconds (7 days). Mobile sessions are cut
/// earlier by the gate; see `nexza_domain::window::check_session`.
pub const SESSION_TOKEN_EXP: u64 = 604800;

/// Identity carried by a validated session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub identity_id: IdentityId,
    pub email: String,
    pub mobile: bool,
    pub started_at: DateTime<Utc>,
    pub exp: u64,
}

/// Errors returned by [`validate_session_token`] and [`issue_session_token`].
#[derive(Debug, thiserror::Error)]
pub enum SessionTokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// JWT claims payload.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | identity-provider subject id |
/// | `email` | custom | address the session was opened with |
/// | `mobile` | custom | session was opened on a mobile device |
/// | `sst` | custom | session start, seconds since epoch |
/// | `exp` | `exp` | expiration, seconds since epoch |
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub mobile: bool,
    pub sst: i64,
    pub exp: u64,
}

/// Sign a new session token starting at `started_at`.
///
/// Returns the token and its `exp` claim.
pub fn issue_session_token(
    identity_id: &IdentityId,
    email: &str,
    mobile: bool,
    started_at: DateTime<Utc>,
    secret: &str,
) -> Result<(String, u64), SessionTokenError> {
    let exp = started_at.timestamp().max(0) as u64 + SESSION_TOKEN_EXP;
    let claims = SessionClaims {
        sub: identity_id.to_string(),
        email: email.to_owned(),
        mobile,
        sst: started_at.timestamp(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(SessionTokenError::Signing)?;
    Ok((token, exp))
}

/// Validate a session cookie value, returning the carried identity.
///
/// Validation: HS256, `exp` checked with the default 60s leeway, required
/// claims `exp` + `sub`.
pub fn validate_session_token(
    cookie_value: &str,
    secret: &str,
) -> Result<SessionInfo, SessionTokenError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<SessionClaims>(
        cookie_value,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionTokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => SessionTokenError::InvalidSignature,
        _ => SessionTokenError::Malformed,
    })?;

    let claims = data.claims;
    if claims.sub.is_empty() {
        return Err(SessionTokenError::Malformed);
    }
    let started_at =
        DateTime::<Utc>::from_timestamp(claims.sst, 0).ok_or(SessionTokenError::Malformed)?;

    Ok(SessionInfo {
        identity_id: IdentityId(claims.sub),
        email: claims.email,
        mobile: claims.mobile,
        started_at,
        exp: claims.exp,
    })
}
