// ── Core error types ──
//
// User-facing errors from rua-core. Consumers never see HTTP status codes
// or envelope codes directly: the `From<rua_api::Error>` impl translates
// transport-layer errors into domain-appropriate variants.

use thiserror::Error;

use crate::sync::DocumentKind;

/// Which half of a sync round-trip failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SyncErrorKind {
    /// Pulling a document from the backend.
    Fetch,
    /// Sending a document to the backend.
    Write,
}

/// A failed `reload` or `push`. Non-fatal and retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to {kind} {document} config: {cause}")]
pub struct SyncError {
    pub kind: SyncErrorKind,
    pub document: DocumentKind,
    pub cause: String,
}

impl SyncError {
    pub fn fetch(document: DocumentKind, cause: impl std::fmt::Display) -> Self {
        Self {
            kind: SyncErrorKind::Fetch,
            document,
            cause: cause.to_string(),
        }
    }

    pub fn write(document: DocumentKind, cause: impl std::fmt::Display) -> Self {
        Self {
            kind: SyncErrorKind::Write,
            document,
            cause: cause.to_string(),
        }
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Data errors ──────────────────────────────────────────────────
    /// A structural lookup failed, e.g. no inbound tagged `socks`.
    /// A data-integrity fault, not something the user can fix here.
    #[error("Entity not found: {entity_type} with id {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Sync errors ──────────────────────────────────────────────────
    #[error(transparent)]
    Sync(#[from] SyncError),

    // ── Backend call errors ──────────────────────────────────────────
    #[error("Backend rejected the request: {message}")]
    Rejected { message: String },

    #[error("{operation} timed out after {timeout_secs}s")]
    Timeout {
        operation: String,
        timeout_secs: u64,
    },

    #[error("Backend unavailable: {reason}")]
    BackendUnavailable { reason: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn socks_inbound_missing() -> Self {
        Self::NotFound {
            entity_type: "inbound".into(),
            identifier: crate::model::SOCKS_INBOUND_TAG.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<rua_api::Error> for CoreError {
    fn from(err: rua_api::Error) -> Self {
        match err {
            rua_api::Error::Authentication { message } => CoreError::Rejected {
                message: format!("authentication failed: {message}"),
            },
            rua_api::Error::Transport(ref e) => {
                if e.is_connect() {
                    CoreError::BackendUnavailable {
                        reason: e.to_string(),
                    }
                } else if e.status().map(|s| s.as_u16()) == Some(404) {
                    CoreError::NotFound {
                        entity_type: "command".into(),
                        identifier: e.url().map(|u| u.path().to_string()).unwrap_or_default(),
                    }
                } else {
                    CoreError::Rejected {
                        message: e.to_string(),
                    }
                }
            }
            rua_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            rua_api::Error::Timeout { timeout_secs } => CoreError::Timeout {
                operation: "backend request".into(),
                timeout_secs,
            },
            rua_api::Error::Backend { code, message } => CoreError::Rejected {
                message: format!("{message} (code {code})"),
            },
            rua_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
