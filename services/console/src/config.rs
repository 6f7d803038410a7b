use serde::Deserialize;

use nexza_core::config::Config;

use crate::infra::identity::DEFAULT_IDENTITY_BASE_URL;

/// Console service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct ConsoleConfig {
    /// PostgreSQL connection URL. Absent: documents live in process memory.
    #[serde(default)]
    pub database_url: Option<String>,
    /// HMAC secret for signing session tokens.
    pub session_secret: String,
    /// Cookie domain attribute (e.g. "example.com").
    pub cookie_domain: String,
    /// Web API key sent to the identity provider.
    pub identity_api_key: String,
    #[serde(default = "default_identity_base_url")]
    pub identity_base_url: String,
    /// Comma-separated administrator addresses. Env var: `ADMIN_EMAILS`.
    #[serde(default)]
    pub admin_emails: String,
    /// TCP port to listen on (default 3120). Env var: `CONSOLE_PORT`.
    #[serde(default = "default_console_port")]
    pub console_port: u16,
    /// Start-up readiness budget in seconds (default 5).
    #[serde(default = "default_ready_timeout_secs")]
    pub ready_timeout_secs: u64,
    /// Outbound identity provider request timeout in seconds (default 10).
    #[serde(default = "default_identity_timeout_secs")]
    pub identity_timeout_secs: u64,
}

impl Config for ConsoleConfig {}

fn default_identity_base_url() -> String {
    DEFAULT_IDENTITY_BASE_URL.to_owned()
}

fn default_console_port() -> u16 {
    3120
}

fn default_ready_timeout_secs() -> u64 {
    5
}

fn default_identity_timeout_secs() -> u64 {
    10
}
