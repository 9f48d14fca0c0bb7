// ── Backend-pushed events ──
//
// The backend emits events on its own schedule (probe progress, core
// restarts, log lines, documents it rewrote). The pump applies them to
// the store in arrival order until cancelled.

use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::gateway::Gateway;
use crate::model::{CoreConfig, CoreStatus, RConfig};

/// One unsolicited message from the backend.
///
/// Wire form: `{"event": "<kebab-name>", "payload": ...}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum BackendEvent {
    /// The backend rewrote the runtime document.
    RuntimeConfig(RConfig),
    /// The backend rewrote the engine document.
    CoreConfig(CoreConfig),
    /// Probe progress for one node.
    SpeedTest { id: String, loading: bool },
    /// One line of core process output.
    Log(String),
    CoreStatus(CoreStatus),
}

/// Apply events from `rx` to `gateway` until `cancel` fires or every
/// sender is gone.
pub fn spawn_event_pump(
    gateway: Gateway,
    mut rx: mpsc::Receiver<BackendEvent>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                event = rx.recv() => {
                    let Some(event) = event else { break };
                    gateway.apply_event(event);
                }
            }
        }
        debug!("event pump stopped");
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::backend::{Backend, UpdateConfig};
    use crate::config::GatewayConfig;
    use crate::error::CoreError;

    struct Unreachable;

    #[async_trait]
    impl Backend for Unreachable {
        async fn get_runtime_config(&self) -> Result<RConfig, CoreError> {
            Err(CoreError::Internal("offline".into()))
        }
        async fn get_core_config(&self) -> Result<CoreConfig, CoreError> {
            Err(CoreError::Internal("offline".into()))
        }
        async fn update_config(&self, _: UpdateConfig) -> Result<(), CoreError> {
            Err(CoreError::Internal("offline".into()))
        }
        async fn select_node(&self, _: &str) -> Result<(), CoreError> {
            Err(CoreError::Internal("offline".into()))
        }
        async fn node_speed(&self, _: &str) -> Result<(), CoreError> {
            Err(CoreError::Internal("offline".into()))
        }
        async fn ready(&self) -> Result<(), CoreError> {
            Ok(())
        }
    }

    fn gateway() -> Gateway {
        let config = GatewayConfig::new("http://127.0.0.1:1".parse().unwrap());
        Gateway::new(config, Arc::new(Unreachable))
    }

    #[test]
    fn decodes_wire_events() {
        let ev: BackendEvent = serde_json::from_value(json!({
            "event": "speed-test",
            "payload": { "id": "n1", "loading": true }
        }))
        .unwrap();
        assert_eq!(
            ev,
            BackendEvent::SpeedTest {
                id: "n1".into(),
                loading: true
            }
        );

        let ev: BackendEvent = serde_json::from_value(json!({
            "event": "core-status",
            "payload": "Restarting"
        }))
        .unwrap();
        assert_eq!(ev, BackendEvent::CoreStatus(CoreStatus::Restarting));
    }

    #[tokio::test]
    async fn pump_applies_in_order_and_stops_when_senders_drop() {
        let gw = gateway();
        let (tx, rx) = mpsc::channel(8);
        let handle = spawn_event_pump(gw.clone(), rx, CancellationToken::new());

        for i in 0..3 {
            tx.send(BackendEvent::Log(format!("line {i}"))).await.unwrap();
        }
        drop(tx);
        handle.await.unwrap();

        let snap = gw.store().snapshot();
        let lines: Vec<&str> = snap.logs().lines().iter().map(String::as_str).collect();
        assert_eq!(lines, ["line 0", "line 1", "line 2"]);
    }

    #[tokio::test]
    async fn pump_stops_on_cancel() {
        let gw = gateway();
        let (tx, rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();
        let handle = spawn_event_pump(gw.clone(), rx, cancel.clone());

        cancel.cancel();
        handle.await.unwrap();
        assert!(tx.is_closed());
    }
}
