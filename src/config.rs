//! Application-level configuration loading, including provisioned accounts.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::roles::RoleTag;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "PITCHCONNECT_CONFIG_PATH";

/// Fixed interval of the authoritative live-match summary poll.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
/// Timeout applied to each outbound snapshot fetch.
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 10;
/// Session lifetime before re-authentication is required.
const DEFAULT_SESSION_TTL_SECS: u64 = 12 * 60 * 60;
/// Interval of the background task pruning expired sessions.
const DEFAULT_JANITOR_INTERVAL_SECS: u64 = 300;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Interval between live snapshot polls.
    pub poll_interval: Duration,
    /// Timeout for one outbound snapshot fetch.
    pub poll_timeout: Duration,
    /// Session lifetime in seconds.
    pub session_ttl_secs: u64,
    /// Interval between expired-session sweeps.
    pub janitor_interval: Duration,
    /// Accounts provisioned at startup by the operator.
    pub bootstrap_users: Vec<BootstrapUser>,
}

/// An account the operator provisions through configuration.
///
/// Credential verification lives with the identity collaborator; a static
/// session token here lets trusted callers authenticate against a fresh
/// deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapUser {
    /// Stable account id; generated when omitted.
    #[serde(default)]
    pub id: Option<Uuid>,
    /// Login email.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Role tags granted to the account.
    #[serde(default)]
    pub roles: Vec<RoleTag>,
    /// Explicit super-admin override.
    #[serde(default)]
    pub super_admin: bool,
    /// Static session token to install for this account, when given.
    #[serde(default)]
    pub session_token: Option<String>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to
    /// built-in defaults when the file is missing or malformed.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        accounts = config.bootstrap_users.len(),
                        "loaded configuration"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            poll_timeout: Duration::from_secs(DEFAULT_POLL_TIMEOUT_SECS),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            janitor_interval: Duration::from_secs(DEFAULT_JANITOR_INTERVAL_SECS),
            bootstrap_users: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file.
struct RawConfig {
    #[serde(default)]
    poll_interval_secs: Option<u64>,
    #[serde(default)]
    poll_timeout_secs: Option<u64>,
    #[serde(default)]
    session_ttl_secs: Option<u64>,
    #[serde(default)]
    janitor_interval_secs: Option<u64>,
    #[serde(default)]
    bootstrap_users: Vec<BootstrapUser>,
}

impl From<RawConfig> for AppConfig {
    fn from(raw: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            poll_interval: raw
                .poll_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
            poll_timeout: raw
                .poll_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_timeout),
            session_ttl_secs: raw.session_ttl_secs.unwrap_or(defaults.session_ttl_secs),
            janitor_interval: raw
                .janitor_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.janitor_interval),
            bootstrap_users: raw.bootstrap_users,
        }
    }
}

/// Resolve the configuration path taking the environment override into
/// account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
