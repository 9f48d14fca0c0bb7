//! Shared configuration for rua front ends.
//!
//! TOML profiles (one per backend endpoint), token resolution
//! (env + plaintext), and translation to `rua_core::GatewayConfig`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rua_core::GatewayConfig;
use rua_core::config::{DEFAULT_LOADING_TTL, DEFAULT_LOG_CAPACITY, DEFAULT_PROBE_TIMEOUT};

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "RUA_CONFIG";

/// Where the desktop backend listens unless told otherwise.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:6789";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    /// Values every profile inherits unless it overrides them.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

/// Timeouts and limits, in seconds and lines.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_probe_timeout")]
    pub probe_timeout: u64,

    /// `0` keeps every log line.
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,

    #[serde(default = "default_loading_ttl")]
    pub loading_ttl: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            probe_timeout: default_probe_timeout(),
            log_capacity: default_log_capacity(),
            loading_ttl: default_loading_ttl(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_probe_timeout() -> u64 {
    DEFAULT_PROBE_TIMEOUT.as_secs()
}
fn default_log_capacity() -> usize {
    DEFAULT_LOG_CAPACITY
}
fn default_loading_ttl() -> u64 {
    DEFAULT_LOADING_TTL.as_secs()
}

/// A named backend profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g., "http://127.0.0.1:6789").
    #[serde(default = "default_url")]
    pub url: String,

    /// Bearer token (plaintext, prefer `token_env`).
    pub token: Option<String>,

    /// Environment variable name containing the token.
    pub token_env: Option<String>,

    /// Override request timeout.
    pub timeout: Option<u64>,

    /// Override probe timeout.
    pub probe_timeout: Option<u64>,

    /// Override log capacity.
    pub log_capacity: Option<usize>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            url: default_url(),
            token: None,
            token_env: None,
            timeout: None,
            probe_timeout: None,
            log_capacity: None,
        }
    }
}

fn default_url() -> String {
    DEFAULT_BACKEND_URL.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `$RUA_CONFIG`, then platform conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("dev", "rua", "rua").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("rua");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + `RUA_`-prefixed environment variables.
///
/// Nested keys use a double underscore: `RUA_DEFAULTS__TIMEOUT=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("RUA_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile resolution ──────────────────────────────────────────────

/// Pick the profile named `requested`, else the configured default.
///
/// An empty config with no explicit request yields the built-in local
/// profile so a fresh install works without a config file.
pub fn resolve_profile(
    cfg: &Config,
    requested: Option<&str>,
) -> Result<(String, Profile), ConfigError> {
    let name = requested
        .map(str::to_owned)
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into());

    match cfg.profiles.get(&name) {
        Some(profile) => Ok((name, profile.clone())),
        None if requested.is_none() => Ok((name, Profile::default())),
        None => Err(ConfigError::UnknownProfile { name }),
    }
}

/// Resolve the bearer token: `token_env` first, then plaintext.
pub fn resolve_token(profile: &Profile) -> Option<SecretString> {
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }
    profile.token.clone().map(SecretString::from)
}

/// Build a `GatewayConfig` from a profile and the global defaults.
pub fn profile_to_gateway_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<GatewayConfig, ConfigError> {
    let url: url::Url = profile.url.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {}", profile.url),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "url".into(),
            reason: format!("expected http or https, got '{}'", url.scheme()),
        });
    }

    let probe_timeout = profile.probe_timeout.unwrap_or(defaults.probe_timeout);
    if probe_timeout == 0 {
        return Err(ConfigError::Validation {
            field: "probe_timeout".into(),
            reason: "must be at least one second".into(),
        });
    }

    let log_capacity = match profile.log_capacity.unwrap_or(defaults.log_capacity) {
        0 => None,
        n => Some(n),
    };

    let mut config = GatewayConfig::new(url);
    config.token = resolve_token(profile);
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.probe_timeout = Duration::from_secs(probe_timeout);
    config.log_capacity = log_capacity;
    config.loading_ttl = Duration::from_secs(defaults.loading_ttl);
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    fn write(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.probe_timeout, 20);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn file_profiles_and_defaults_merge() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            r#"
default_profile = "home"

[defaults]
timeout = 10

[profiles.home]
url = "http://10.0.0.2:6789"
log_capacity = 0
"#,
        );

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.defaults.timeout, 10);
        assert_eq!(cfg.defaults.log_capacity, 5000);

        let (name, profile) = resolve_profile(&cfg, None).unwrap();
        assert_eq!(name, "home");
        let gw = profile_to_gateway_config(&profile, &cfg.defaults).unwrap();
        assert_eq!(gw.url.as_str(), "http://10.0.0.2:6789/");
        assert_eq!(gw.timeout, Duration::from_secs(10));
        assert_eq!(gw.log_capacity, None);
    }

    #[test]
    fn unknown_named_profile_is_an_error() {
        let cfg = Config::default();
        let err = resolve_profile(&cfg, Some("work")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile { name } if name == "work"));
    }

    #[test]
    fn empty_config_falls_back_to_local_backend() {
        let (name, profile) = resolve_profile(&Config::default(), None).unwrap();
        assert_eq!(name, "default");
        assert_eq!(profile.url, DEFAULT_BACKEND_URL);
    }

    #[test]
    fn rejects_non_http_url() {
        let profile = Profile {
            url: "ftp://example.com".into(),
            ..Profile::default()
        };
        let err = profile_to_gateway_config(&profile, &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "url"));
    }

    #[test]
    fn plaintext_token_is_used_without_env() {
        let profile = Profile {
            token: Some("abc".into()),
            token_env: Some("RUA_TEST_TOKEN_THAT_IS_NEVER_SET".into()),
            ..Profile::default()
        };
        assert_eq!(resolve_token(&profile).unwrap().expose_secret(), "abc");
    }

    #[test]
    fn save_then_load_preserves_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                url: "http://127.0.0.1:7000".into(),
                probe_timeout: Some(5),
                ..Profile::default()
            },
        );

        save_config_to(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles, cfg.profiles);
    }
}
