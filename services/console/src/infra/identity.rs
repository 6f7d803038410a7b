//! Identity-Toolkit style REST client.
//!
//! `POST {base}/v1/accounts:signUp` and
//! `POST {base}/v1/accounts:signInWithPassword`, both taking
//! `{email, password, returnSecureToken}` and answering `{localId, email}`
//! or `{"error": {"message": "EMAIL_EXISTS"}}`. The API key travels in the
//! `x-goog-api-key` header so it never appears in a URL.

use std::time::Duration;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use nexza_domain::id::IdentityId;

use crate::domain::repository::{IdentityProvider, ProviderIdentity};
use crate::error::AuthError;

pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Transport errors print their request URL; strip it before logging.
fn describe(e: reqwest::Error) -> String {
    e.without_url().to_string()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    email: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Clone)]
pub struct IdentityToolkitProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl IdentityToolkitProvider {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build identity provider client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
        })
    }

    fn request(&self, operation: &str, email: &str, password: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}/v1/accounts:{operation}", self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&CredentialRequest {
                email,
                password,
                return_secure_token: true,
            })
    }

    async fn call(
        &self,
        operation: &str,
        email: &str,
        password: &str,
    ) -> Result<ProviderIdentity, AuthError> {
        let resp = self
            .request(operation, email, password)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %describe(e), operation, "identity provider unreachable");
                AuthError::Network
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let envelope: ErrorEnvelope = resp.json().await.map_err(|e| {
                tracing::warn!(error = %describe(e), %status, "unreadable identity provider error");
                AuthError::Provider(format!("identity provider answered {status}"))
            })?;
            return Err(map_provider_error(&envelope.error.message));
        }

        let account: AccountResponse = resp.json().await.map_err(|e| {
            tracing::warn!(error = %describe(e), "unreadable identity provider response");
            AuthError::Provider("unexpected identity provider response".to_owned())
        })?;
        Ok(ProviderIdentity {
            identity_id: IdentityId(account.local_id),
            email: account.email.unwrap_or_else(|| email.to_owned()),
        })
    }
}

impl IdentityProvider for IdentityToolkitProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<ProviderIdentity, AuthError> {
        self.call("signUp", email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderIdentity, AuthError> {
        self.call("signInWithPassword", email, password).await
    }
}

/// Map a provider error message such as `WEAK_PASSWORD : Password should be
/// at least 6 characters` onto the console's taxonomy.
pub fn map_provider_error(message: &str) -> AuthError {
    let code = message
        .split([' ', ':'])
        .next()
        .unwrap_or_default()
        .trim();
    match code {
        "EMAIL_EXISTS" => AuthError::EmailInUse,
        "WEAK_PASSWORD" => AuthError::WeakPassword,
        "EMAIL_NOT_FOUND" => AuthError::AccountNotFound,
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => AuthError::WrongPassword,
        "INVALID_EMAIL" | "MISSING_EMAIL" => AuthError::InvalidEmail,
        "API_KEY_INVALID" | "INVALID_API_KEY" => AuthError::InvalidApiKey,
        _ => AuthError::Provider(format!("An error occurred during authentication ({code})")),
    }
}
