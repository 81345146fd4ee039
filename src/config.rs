//! Mobi connection configuration.
//!
//! Read once from the process environment at startup and immutable afterward.

use std::fmt;

use url::Url;

use crate::error::{McpError, Result};

/// Environment variable holding the Mobi base URL (e.g. `https://localhost:8443`).
pub const ENV_BASE_URL: &str = "MOBI_BASE_URL";
/// Environment variable holding the Mobi username.
pub const ENV_USERNAME: &str = "MOBI_USERNAME";
/// Environment variable holding the Mobi password.
pub const ENV_PASSWORD: &str = "MOBI_PASSWORD";
/// Environment variable that disables certificate verification when `true`.
pub const ENV_IGNORE_CERT: &str = "MOBI_IGNORE_CERT";

/// Connection settings for a Mobi server.
#[derive(Clone)]
pub struct MobiConfig {
    /// Base URL of the Mobi server, without a trailing slash
    pub base_url: String,
    /// Basic-auth username
    pub username: String,
    /// Basic-auth password
    pub password: String,
    /// Skip TLS certificate verification
    pub ignore_cert: bool,
}

impl fmt::Debug for MobiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MobiConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("ignore_cert", &self.ignore_cert)
            .finish()
    }
}

impl MobiConfig {
    /// Create a configuration from explicit values.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        ignore_cert: bool,
    ) -> Result<Self> {
        let base_url = normalize_base_url(&base_url.into())?;
        Ok(Self {
            base_url,
            username: username.into(),
            password: password.into(),
            ignore_cert,
        })
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| McpError::Config(format!("{} is not set", key)))
        };

        let base_url = required(ENV_BASE_URL)?;
        let username = required(ENV_USERNAME)?;
        let password = required(ENV_PASSWORD)?;
        let ignore_cert = lookup(ENV_IGNORE_CERT)
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Self::new(base_url, username, password, ignore_cert)
    }

    /// Root of the Mobi REST API.
    pub fn rest_url(&self) -> String {
        format!("{}/mobirest", self.base_url)
    }
}

/// `true` (any case, surrounding whitespace ignored) enables the flag;
/// everything else leaves it off.
fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed)
        .map_err(|e| McpError::Config(format!("{} is not a valid URL: {}", ENV_BASE_URL, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(McpError::Config(format!(
            "{} must use http or https, got '{}'",
            ENV_BASE_URL, other
        ))),
    }
}
