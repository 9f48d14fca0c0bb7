// ── Runtime gateway configuration ──
//
// Describes *how* to reach the backend and how long to wait on it.
// Never touches disk: rua-config (or any other front end) builds a
// `GatewayConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Default bound on a node connectivity/speed probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(20);

/// Default number of log lines kept in memory.
pub const DEFAULT_LOG_CAPACITY: usize = 5000;

/// Default age after which an unresolved loading flag is cleared.
pub const DEFAULT_LOADING_TTL: Duration = Duration::from_secs(60);

/// Configuration for one backend connection.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Backend base URL (e.g., `http://127.0.0.1:6789`).
    pub url: Url,
    /// Bearer token, if the backend requires one.
    pub token: Option<SecretString>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Upper bound on a single node probe.
    pub probe_timeout: Duration,
    /// Log buffer capacity. `None` keeps every line.
    pub log_capacity: Option<usize>,
    /// Loading flags older than this are cleared by
    /// [`Gateway::expire_stale_loading`](crate::Gateway::expire_stale_loading).
    pub loading_ttl: Duration,
}

impl GatewayConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            token: None,
            timeout: Duration::from_secs(30),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            log_capacity: Some(DEFAULT_LOG_CAPACITY),
            loading_ttl: DEFAULT_LOADING_TTL,
        }
    }

    pub(crate) fn transport(&self) -> rua_api::TransportConfig {
        rua_api::TransportConfig {
            timeout: self.timeout,
            token: self.token.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn defaults_follow_probe_guard() {
        let cfg = GatewayConfig::new("http://127.0.0.1:6789".parse().unwrap());
        assert_eq!(cfg.probe_timeout, Duration::from_secs(20));
        assert_eq!(cfg.log_capacity, Some(5000));
        assert!(cfg.token.is_none());
    }

    #[test]
    fn transport_carries_timeout_and_token() {
        let mut cfg = GatewayConfig::new("http://localhost:1".parse().unwrap());
        cfg.timeout = Duration::from_secs(5);
        cfg.token = Some(SecretString::from("s3cret"));

        let transport = cfg.transport();
        assert_eq!(transport.timeout, Duration::from_secs(5));
        assert_eq!(transport.token.unwrap().expose_secret(), "s3cret");
    }
}
