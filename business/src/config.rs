//! Connection settings and grid behaviour policies.

use std::env::vars;
use std::fmt;

use log::info;
use serde::Deserialize;
use thiserror::Error;

/// Prefix of every environment variable read by [`GridConfig::from_env`].
pub const ENV_PREFIX: &str = "SENDER_GRID_";

/// Path of the senders collection below the API server root.
pub const SENDERS_PATH: &str = "/api/marketing/senders";

/// Where to fetch senders from and how to authenticate.
///
/// Both values are mandatory. Equality is by value; the grid reloads when a
/// new config differs from the current one.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    base_url: String,
    auth_token: String,
}

impl ConnectionConfig {
    pub fn new(base_url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_token: auth_token.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    /// `{base_url}/api/marketing/senders`, ignoring a trailing slash on the base.
    pub fn senders_url(&self) -> String {
        format!("{}{SENDERS_PATH}", self.base_url.trim_end_matches('/'))
    }

    /// Names the first blank field, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.base_url.trim().is_empty() {
            Some("base_url")
        } else if self.auth_token.trim().is_empty() {
            Some("auth_token")
        } else {
            None
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("base_url", &self.base_url)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

/// What happens to the rows already on screen when a load fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadFailurePolicy {
    /// Keep the last successfully loaded rows and surface the error.
    #[default]
    KeepStale,
    /// Drop every row and surface the error.
    Clear,
}

/// What the grid does after the host reports a successful delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeletePolicy {
    /// Wait for the host to emit `SENDER_UPDATED`.
    #[default]
    AwaitSignal,
    /// Reload right away.
    Reload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridPolicy {
    pub on_load_failure: LoadFailurePolicy,
    pub after_delete: DeletePolicy,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {ENV_PREFIX}{0}")]
    MissingVar(&'static str),
    #[error("invalid sender grid environment: {0}")]
    Env(#[from] serde_env::Error),
}

#[derive(Debug, Deserialize)]
struct RawGridConfig {
    base_url: Option<String>,
    auth_token: Option<String>,
    on_load_failure: Option<LoadFailurePolicy>,
    after_delete: Option<DeletePolicy>,
}

/// Everything needed to run a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridConfig {
    pub connection: ConnectionConfig,
    pub policy: GridPolicy,
}

impl GridConfig {
    /// Reads `SENDER_GRID_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading sender grid configuration from environment variables");
        Self::from_vars(vars())
    }

    /// Builds a config from `(name, value)` pairs; names without the
    /// `SENDER_GRID_` prefix are ignored.
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Result<Self, ConfigError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let scoped: Vec<(String, String)> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.as_ref()
                    .strip_prefix(ENV_PREFIX)
                    .map(|name| (name.to_owned(), value.as_ref().to_owned()))
            })
            .collect();

        let raw: RawGridConfig = serde_env::from_iter(scoped)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawGridConfig) -> Result<Self, ConfigError> {
        let RawGridConfig {
            base_url,
            auth_token,
            on_load_failure,
            after_delete,
        } = raw;

        let base_url = base_url
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar("BASE_URL"))?;
        let auth_token = auth_token
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar("AUTH_TOKEN"))?;

        Ok(Self {
            connection: ConnectionConfig::new(base_url, auth_token),
            policy: GridPolicy {
                on_load_failure: on_load_failure.unwrap_or_default(),
                after_delete: after_delete.unwrap_or_default(),
            },
        })
    }
}
