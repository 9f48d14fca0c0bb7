// ── Sync gateway ──
//
// Reconciles the config slice with the backend's documents and routes
// node actions (select, probe) to the backend. Every await happens
// outside a store mutation: state is read or written synchronously, then
// the backend call runs, then its result is applied as a separate commit.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::DocumentKind;
use super::events::BackendEvent;
use super::notification::Notification;
use crate::backend::{Backend, HttpBackend, UpdateConfig};
use crate::config::GatewayConfig;
use crate::error::{CoreError, SyncError};
use crate::store::{Action, Store};

const NOTIFICATION_CHANNEL_SIZE: usize = 64;

/// Entry point for everything that crosses the backend boundary.
///
/// Cheaply cloneable via `Arc<GatewayInner>`.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    config: GatewayConfig,
    store: Arc<Store>,
    backend: Arc<dyn Backend>,
    notifications: broadcast::Sender<Notification>,
    ready_sent: AtomicBool,
}

impl Gateway {
    /// Build a gateway with a fresh store sized from `config`.
    pub fn new(config: GatewayConfig, backend: Arc<dyn Backend>) -> Self {
        let store = Arc::new(Store::with_log_capacity(config.log_capacity));
        Self::with_store(config, backend, store)
    }

    /// Build a gateway over an existing store.
    pub fn with_store(config: GatewayConfig, backend: Arc<dyn Backend>, store: Arc<Store>) -> Self {
        let (notifications, _) = broadcast::channel(NOTIFICATION_CHANNEL_SIZE);
        Self {
            inner: Arc::new(GatewayInner {
                config,
                store,
                backend,
                notifications,
                ready_sent: AtomicBool::new(false),
            }),
        }
    }

    /// Build a gateway talking HTTP to `config.url`.
    pub fn over_http(config: GatewayConfig) -> Result<Self, CoreError> {
        let backend = HttpBackend::new(&config)?;
        Ok(Self::new(config, Arc::new(backend)))
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.inner.store
    }

    /// Subscribe to user-visible notifications.
    pub fn notifications(&self) -> broadcast::Receiver<Notification> {
        self.inner.notifications.subscribe()
    }

    fn notify(&self, notification: Notification) {
        // No receivers is fine: nobody is showing toasts.
        let _ = self.inner.notifications.send(notification);
    }

    // ── Document sync ────────────────────────────────────────────────

    /// Fetch `kind` from the backend and replace the local copy.
    ///
    /// On failure the store is left untouched.
    pub async fn reload(&self, kind: DocumentKind) -> Result<(), SyncError> {
        let backend = &self.inner.backend;
        let store = &self.inner.store;

        let outcome = match kind {
            DocumentKind::Core => backend
                .get_core_config()
                .await
                .map(|doc| store.replace_core_config(doc)),
            DocumentKind::Runtime => backend
                .get_runtime_config()
                .await
                .map(|doc| store.replace_runtime_config(doc)),
        };

        match outcome {
            Ok(()) => {
                info!(document = %kind, version = store.version(), "config reloaded");
                Ok(())
            }
            Err(e) => {
                warn!(document = %kind, error = %e, "config reload failed");
                let err = SyncError::fetch(kind, &e);
                self.notify(Notification::error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Reload both documents. Both are attempted; the first failure is
    /// returned.
    pub async fn reload_all(&self) -> Result<(), SyncError> {
        let runtime = self.reload(DocumentKind::Runtime).await;
        let core = self.reload(DocumentKind::Core).await;
        runtime.and(core)
    }

    /// Send the current local copy of `kind` to the backend.
    ///
    /// The document is captured before the request is issued. A failed
    /// write leaves the local copy as it is; there is no rollback.
    pub async fn push(&self, kind: DocumentKind) -> Result<(), SyncError> {
        let snapshot = self.inner.store.snapshot();
        let update = match kind {
            DocumentKind::Core => {
                let Some(core) = snapshot.config().core() else {
                    let err = SyncError::write(kind, "core config has not been loaded");
                    self.notify(Notification::error(err.to_string()));
                    return Err(err);
                };
                UpdateConfig::core(core.as_ref().clone())
            }
            DocumentKind::Runtime => UpdateConfig::runtime(snapshot.config().rua().as_ref().clone()),
        };
        drop(snapshot);

        match self.inner.backend.update_config(update).await {
            Ok(()) => {
                info!(document = %kind, "config pushed");
                self.notify(Notification::success("Update config success"));
                Ok(())
            }
            Err(e) => {
                warn!(document = %kind, error = %e, "config push failed");
                let err = SyncError::write(kind, &e);
                self.notify(Notification::error(err.to_string()));
                Err(err)
            }
        }
    }

    // ── Node actions ─────────────────────────────────────────────────

    /// Ask the backend to route through `node_id`.
    ///
    /// The local selection is not touched: `current_id` only changes when
    /// the backend sends a new runtime document.
    pub async fn select_node(&self, node_id: &str) -> Result<(), CoreError> {
        debug!(node_id, "selecting node");
        self.inner.backend.select_node(node_id).await.map_err(|e| {
            warn!(node_id, error = %e, "select node failed");
            self.notify(Notification::error(format!("Select node failed: {e}")));
            e
        })
    }

    /// Probe connectivity and speed of `node_id`.
    ///
    /// The node's loading flag is raised for the duration of the call and
    /// always cleared afterwards, including on timeout. On success the
    /// runtime document is reloaded to pick up the measured values.
    pub async fn probe_node(&self, node_id: &str) -> Result<(), CoreError> {
        let store = &self.inner.store;
        let probe_timeout = self.inner.config.probe_timeout;

        store.dispatch(Action::SetNodeLoading {
            node_id: node_id.to_owned(),
            loading: true,
            at: Utc::now(),
        });

        let result =
            match tokio::time::timeout(probe_timeout, self.inner.backend.node_speed(node_id)).await
            {
                Ok(inner) => inner,
                Err(_) => Err(CoreError::Timeout {
                    operation: "speed test".into(),
                    timeout_secs: probe_timeout.as_secs(),
                }),
            };

        store.dispatch(Action::SetNodeLoading {
            node_id: node_id.to_owned(),
            loading: false,
            at: Utc::now(),
        });

        match result {
            Ok(()) => {
                debug!(node_id, "probe finished");
                self.reload(DocumentKind::Runtime).await?;
                Ok(())
            }
            Err(e) => {
                warn!(node_id, error = %e, "probe failed");
                self.notify(Notification::error(format!("Speed test failed: {e}")));
                Err(e)
            }
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Tell the backend the interface is live. Only the first call sends
    /// anything; a failed send may be retried.
    pub async fn announce_ready(&self) -> Result<(), CoreError> {
        if self.inner.ready_sent.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        if let Err(e) = self.inner.backend.ready().await {
            self.inner.ready_sent.store(false, Ordering::Release);
            warn!(error = %e, "ready signal failed");
            return Err(e);
        }
        debug!("ready signal sent");
        Ok(())
    }

    /// Clear loading flags older than the configured TTL. Returns the ids
    /// that were cleared.
    pub fn expire_stale_loading(&self) -> Vec<String> {
        let Ok(ttl) = chrono::Duration::from_std(self.inner.config.loading_ttl) else {
            return Vec::new();
        };
        let now = Utc::now();
        let mut probe = self.inner.store.snapshot().ui().loading.clone();
        if probe.node_speed_test.expire_older_than(now, ttl).is_empty()
            && probe.subscription_update.expire_older_than(now, ttl).is_empty()
        {
            return Vec::new();
        }

        let mut expired = Vec::new();
        self.inner.store.update_ui(|ui| {
            expired = ui.loading.node_speed_test.expire_older_than(now, ttl);
            expired.extend(ui.loading.subscription_update.expire_older_than(now, ttl));
        });
        if !expired.is_empty() {
            warn!(count = expired.len(), "cleared stale loading flags");
            self.notify(Notification::warning(format!(
                "{} operation(s) did not finish in time",
                expired.len()
            )));
        }
        expired
    }

    /// Apply an event pushed by the backend.
    pub fn apply_event(&self, event: BackendEvent) {
        let store = &self.inner.store;
        match event {
            BackendEvent::RuntimeConfig(doc) => store.replace_runtime_config(doc),
            BackendEvent::CoreConfig(doc) => store.replace_core_config(doc),
            BackendEvent::SpeedTest { id, loading } => store.dispatch(Action::SetNodeLoading {
                node_id: id,
                loading,
                at: Utc::now(),
            }),
            BackendEvent::Log(line) => store.append_log(line),
            BackendEvent::CoreStatus(status) => store.dispatch(Action::SetCoreStatus(status)),
        }
    }
}
