//! Session extractors. Every protected handler takes one of these, so the
//! gate finishes before the handler body runs.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use nexza_domain::id::IdentityId;
use nexza_session_types::cookie::NEXZA_SESSION;
use nexza_session_types::token::validate_session_token;

use crate::error::{ConsoleError, GateRejection};
use crate::state::AppState;
use crate::usecase::gate::{ResolveSessionUseCase, ResolvedSession};

fn session_cookie(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(NEXZA_SESSION)
        .map(|c| c.value().to_owned())
}

async fn resolve(state: &AppState, token: Option<&str>) -> Result<ResolvedSession, ConsoleError> {
    let usecase = ResolveSessionUseCase {
        users: state.user_repo(),
        clock: state.clock.clone(),
        admins: state.admins.clone(),
        session_secret: state.session_secret.clone(),
    };
    usecase.execute(token).await
}

/// Any signed-in, non-banned identity.
#[derive(Debug, Clone)]
pub struct Session(pub ResolvedSession);

impl FromRequestParts<AppState> for Session {
    type Rejection = GateRejection;

    // Same shape as axum-core's signature: read parts synchronously, then
    // return an owned 'static future.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = session_cookie(parts);
        let state = state.clone();
        async move {
            resolve(&state, token.as_deref())
                .await
                .map(Session)
                .map_err(|error| GateRejection {
                    error,
                    cookie_domain: state.cookie_domain.clone(),
                })
        }
    }
}

/// A resolved session whose email is on the admin allow-list.
#[derive(Debug, Clone)]
pub struct AdminSession(pub ResolvedSession);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = GateRejection;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = session_cookie(parts);
        let state = state.clone();
        async move {
            let checked = match resolve(&state, token.as_deref()).await {
                Ok(session) => session.require_admin().map(|()| session),
                Err(e) => Err(e),
            };
            checked.map(AdminSession).map_err(|error| GateRejection {
                error,
                cookie_domain: state.cookie_domain.clone(),
            })
        }
    }
}

/// Identity carried by a valid session cookie, without running the gate.
/// Used by public forms that attach the sender when one is known.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<IdentityId>);

impl FromRequestParts<AppState> for MaybeIdentity {
    type Rejection = Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = session_cookie(parts)
            .and_then(|token| validate_session_token(&token, &state.session_secret).ok())
            .map(|info| info.identity_id);
        async move { Ok(MaybeIdentity(identity)) }
    }
}
