//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help text.

use miette::Diagnostic;
use thiserror::Error;

use rua_config::ConfigError;
use rua_core::{CoreError, SyncError, SyncErrorKind};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the backend")]
    #[diagnostic(
        code(rua::connection_failed),
        help("Check that the rua desktop app is running, or pass --url.\nDetail: {reason}")
    )]
    ConnectionFailed { reason: String },

    #[error("Backend rejected the request: {message}")]
    #[diagnostic(code(rua::rejected))]
    Rejected { message: String },

    #[error("Authentication failed")]
    #[diagnostic(
        code(rua::auth_failed),
        help("Set a token with --token, RUA_TOKEN, or `token_env` in the profile.")
    )]
    AuthFailed,

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(rua::not_found), help("{hint}"))]
    NotFound {
        resource_type: String,
        identifier: String,
        hint: String,
    },

    // ── Sync ─────────────────────────────────────────────────────────
    #[error("{error}")]
    #[diagnostic(code(rua::sync), help("{hint}"))]
    Sync { error: SyncError, hint: String },

    #[error("{operation} timed out after {seconds}s")]
    #[diagnostic(code(rua::timeout))]
    Timeout { operation: String, seconds: u64 },

    // ── Validation / configuration ───────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(rua::validation))]
    Validation { field: String, reason: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(rua::profile_not_found),
        help("Available profiles: {available}\nCreate one with: rua config init --name {name}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(rua::config))]
    Config(ConfigError),

    #[error("Internal error: {0}")]
    #[diagnostic(code(rua::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON document: {0}")]
    #[diagnostic(code(rua::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::BackendUnavailable { reason } => CliError::ConnectionFailed { reason },
            CoreError::Rejected { message } if message.starts_with("authentication failed") => {
                CliError::AuthFailed
            }
            CoreError::Rejected { message } => CliError::Rejected { message },
            CoreError::NotFound {
                entity_type,
                identifier,
            } => {
                let hint = if entity_type == "inbound" {
                    "The engine config has no inbound with this tag. Reload it with: rua reload core"
                        .to_owned()
                } else {
                    format!("Run: rua nodes to see available {entity_type}s")
                };
                CliError::NotFound {
                    resource_type: entity_type,
                    identifier,
                    hint,
                }
            }
            CoreError::Sync(e) => e.into(),
            CoreError::Timeout {
                operation,
                timeout_secs,
            } => CliError::Timeout {
                operation,
                seconds: timeout_secs,
            },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<SyncError> for CliError {
    fn from(error: SyncError) -> Self {
        let hint = match error.kind {
            SyncErrorKind::Fetch => "Nothing was changed locally. Re-run the command to retry.",
            SyncErrorKind::Write => {
                "The backend kept its previous copy.\nThe local edit was applied and not rolled back; \
                 re-run the command to send it again."
            }
        };
        CliError::Sync {
            error,
            hint: hint.to_owned(),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}
