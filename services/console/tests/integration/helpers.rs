#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::extract::Path;
use axum::http::{HeaderMap, Request, Response, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde_json::json;

use nexza_console::domain::repository::{
    AnnouncementRepository, CodeNotifier, IdentityProvider, ProviderIdentity,
    VerificationCodeRepository,
};
use nexza_console::domain::types::{Announcement, UserProfile, VerificationCode, Versioned};
use nexza_console::error::{AuthError, ConsoleError};
use nexza_console::infra::identity::IdentityToolkitProvider;
use nexza_console::infra::memory::MemoryDocumentStore;
use nexza_console::infra::notifier::LogCodeNotifier;
use nexza_console::infra::repo::{
    DocUserRepository, DocUsernameRepository, DocVerificationCodeRepository,
};
use nexza_console::state::AppState;
use nexza_domain::email::AdminAllowList;
use nexza_domain::id::{AnnouncementId, IdentityId};
use nexza_testing::clock::ManualClock;
use nexza_testing::session::TEST_SESSION_SECRET;

pub const ADMIN_EMAIL: &str = "admin@nexza.com";
pub const COOKIE_DOMAIN: &str = "example.com";

// ── FakeIdentityProvider ─────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct FakeIdentityProvider {
    /// email → (identity id, password)
    pub accounts: Arc<Mutex<HashMap<String, (String, String)>>>,
    pub offline: bool,
}

impl FakeIdentityProvider {
    pub fn with_account(email: &str, id: &str, password: &str) -> Self {
        let provider = Self::default();
        provider
            .accounts
            .lock()
            .unwrap()
            .insert(email.to_owned(), (id.to_owned(), password.to_owned()));
        provider
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }
}

impl IdentityProvider for FakeIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<ProviderIdentity, AuthError> {
        if self.offline {
            return Err(AuthError::Network);
        }
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(AuthError::EmailInUse);
        }
        let id = format!("uid-{}", accounts.len() + 1);
        accounts.insert(email.to_owned(), (id.clone(), password.to_owned()));
        Ok(ProviderIdentity {
            identity_id: IdentityId(id),
            email: email.to_owned(),
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderIdentity, AuthError> {
        if self.offline {
            return Err(AuthError::Network);
        }
        let accounts = self.accounts.lock().unwrap();
        let (id, stored) = accounts.get(email).ok_or(AuthError::AccountNotFound)?;
        if stored != password {
            return Err(AuthError::WrongPassword);
        }
        Ok(ProviderIdentity {
            identity_id: IdentityId(id.clone()),
            email: email.to_owned(),
        })
    }
}

// ── RecordingNotifier ────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    pub fn last_code(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, code)| code.clone())
    }
}

impl CodeNotifier for RecordingNotifier {
    async fn deliver(&self, subject: &str, code: &str) -> Result<(), ConsoleError> {
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_owned(), code.to_owned()));
        Ok(())
    }
}

// ── Racing code repository ───────────────────────────────────────────────────

/// Bumps the stored version right after every read, as if another request
/// had written the record in between.
pub struct RacingCodeRepo {
    pub inner: DocVerificationCodeRepository<MemoryDocumentStore>,
}

impl VerificationCodeRepository for RacingCodeRepo {
    async fn find(&self, subject: &str) -> Result<Option<Versioned<VerificationCode>>, ConsoleError> {
        let found = self.inner.find(subject).await?;
        if let Some(ref v) = found {
            let mut rival = v.value.clone();
            rival.consumed = true;
            rival.consumed_at = Some(v.value.issued_at);
            self.inner.replace(&rival, v.version).await?;
        }
        Ok(found)
    }

    async fn put(&self, code: &VerificationCode) -> Result<(), ConsoleError> {
        self.inner.put(code).await
    }

    async fn replace(&self, code: &VerificationCode, expected_version: i64) -> Result<bool, ConsoleError> {
        self.inner.replace(code, expected_version).await
    }

    async fn delete(&self, subject: &str) -> Result<(), ConsoleError> {
        self.inner.delete(subject).await
    }
}

// ── Failing announcement repository ──────────────────────────────────────────

pub struct FailingAnnouncementRepo;

impl AnnouncementRepository for FailingAnnouncementRepo {
    async fn insert(&self, _announcement: &Announcement) -> Result<(), ConsoleError> {
        Err(anyhow::anyhow!("store offline").into())
    }

    async fn list(&self) -> Result<Vec<Announcement>, ConsoleError> {
        Err(anyhow::anyhow!("store offline").into())
    }

    async fn delete(&self, _id: AnnouncementId) -> Result<bool, ConsoleError> {
        Err(anyhow::anyhow!("store offline").into())
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn code_repo(store: &MemoryDocumentStore) -> DocVerificationCodeRepository<MemoryDocumentStore> {
    DocVerificationCodeRepository {
        store: store.clone(),
    }
}

pub fn user_repo(store: &MemoryDocumentStore) -> DocUserRepository<MemoryDocumentStore> {
    DocUserRepository {
        store: store.clone(),
    }
}

pub fn username_repo(store: &MemoryDocumentStore) -> DocUsernameRepository<MemoryDocumentStore> {
    DocUsernameRepository {
        store: store.clone(),
    }
}

pub fn admins() -> Arc<AdminAllowList> {
    Arc::new(AdminAllowList::new([ADMIN_EMAIL, "developer@nexza.com"]))
}

pub fn profile(id: &str, email: &str, at: DateTime<Utc>) -> UserProfile {
    UserProfile::first_seen(IdentityId::from(id), email.to_owned(), at)
}

/// Router state over a fresh memory store. The identity provider points at
/// a closed port; routes that reach it answer `NETWORK_FAILURE`.
pub fn test_state(store: &MemoryDocumentStore, clock: &ManualClock) -> AppState {
    test_state_with_identity(store, clock, "http://127.0.0.1:9")
}

pub fn test_state_with_identity(
    store: &MemoryDocumentStore,
    clock: &ManualClock,
    identity_url: &str,
) -> AppState {
    AppState {
        store: store.clone().into(),
        identity: IdentityToolkitProvider::new(identity_url, TEST_API_KEY, Duration::from_secs(2))
            .unwrap(),
        notifier: LogCodeNotifier,
        clock: Arc::new(clock.clone()),
        admins: admins(),
        session_secret: TEST_SESSION_SECRET.to_owned(),
        cookie_domain: COOKIE_DOMAIN.to_owned(),
    }
}

// ── Fake Identity Toolkit ────────────────────────────────────────────────────

pub const TEST_API_KEY: &str = "test-key";

async fn fake_accounts(
    Path(op): Path<String>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some(TEST_API_KEY) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"code": 400, "message": "API_KEY_INVALID"}})),
        );
    }
    let email = body["email"].as_str().unwrap_or_default().to_owned();
    match op.as_str() {
        "accounts:signUp" | "accounts:signInWithPassword" => (
            StatusCode::OK,
            Json(json!({"localId": format!("uid-{email}"), "email": email})),
        ),
        _ => (StatusCode::NOT_FOUND, Json(json!({}))),
    }
}

/// Serve a minimal Identity Toolkit on a loopback port; returns its base URL.
/// Every sign-up or sign-in succeeds with `localId = "uid-<email>"`.
pub async fn spawn_identity_toolkit() -> String {
    let app = Router::new().route("/v1/{op}", post(fake_accounts));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(resp: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
