// ── Store composer ──
//
// Merges the config, log, and UI slices into one addressable tree with a
// single change stream. Each mutation commits exactly one new snapshot and
// sends exactly one notification.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

use super::action::{Action, reduce};
use super::config_slice::ConfigState;
use super::log_slice::LogState;
use super::state::{AppState, apply};
use super::ui_slice::UiState;
use crate::error::CoreError;
use crate::model::{CoreConfig, Inbound, RConfig};
use crate::stream::{Projection, Selection};

/// The reactive state store.
///
/// Readers take cheap `Arc` snapshots that never change underneath them.
/// Writers go through the mutation methods below, which run the caller's
/// closure against a copy-on-write draft and publish the result.
///
/// Mutator closures run while the store holds its write lock: they must
/// not call back into the same store.
pub struct Store {
    state: watch::Sender<Arc<AppState>>,
}

impl Store {
    pub fn new() -> Self {
        Self::with_log_capacity(None)
    }

    pub fn with_log_capacity(log_capacity: Option<usize>) -> Self {
        let (state, _) = watch::channel(Arc::new(AppState::new(log_capacity)));
        Self { state }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// The current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<AppState> {
        self.state.borrow().clone()
    }

    pub fn version(&self) -> u64 {
        self.state.borrow().version()
    }

    pub fn runtime_config(&self) -> Arc<RConfig> {
        Arc::clone(self.state.borrow().config().rua())
    }

    pub fn core_config(&self) -> Option<Arc<CoreConfig>> {
        self.state.borrow().config().core().cloned()
    }

    // ── Commit primitives ────────────────────────────────────────────

    /// Apply a typed transition.
    pub fn dispatch(&self, action: Action) {
        self.state.send_modify(|snap| {
            let next = reduce(snap, action);
            *snap = next;
        });
        debug!(version = self.version(), "store commit");
    }

    /// Mutate any combination of slices under a single notification.
    pub fn batch(&self, f: impl FnOnce(&mut AppState)) {
        self.state.send_modify(|snap| {
            let next = apply(snap, f);
            *snap = next;
        });
        debug!(version = self.version(), "store commit (batch)");
    }

    // ── Config slice ─────────────────────────────────────────────────

    pub fn replace_runtime_config(&self, doc: RConfig) {
        self.dispatch(Action::ReplaceRuntimeConfig(doc));
    }

    pub fn replace_core_config(&self, doc: CoreConfig) {
        self.dispatch(Action::ReplaceCoreConfig(doc));
    }

    /// Arbitrary structural edit of `{rua, core}`.
    pub fn mutate_config(&self, f: impl FnOnce(&mut ConfigState)) {
        self.batch(|state| f(state.config_mut()));
    }

    /// Edit the inbound tagged `socks`.
    ///
    /// Fails with [`CoreError::NotFound`] when the engine document is not
    /// loaded or has no such inbound; nothing is committed in that case.
    pub fn mutate_socks_inbound(&self, f: impl FnOnce(&mut Inbound)) -> Result<(), CoreError> {
        let mut outcome = Ok(());
        self.state.send_if_modified(|snap| {
            let present = snap
                .config()
                .core()
                .is_some_and(|core| core.socks_inbound().is_some());
            if !present {
                outcome = Err(CoreError::socks_inbound_missing());
                return false;
            }
            let next = apply(snap, |state| {
                if let Ok(inbound) = state.config_mut().socks_inbound_mut() {
                    f(inbound);
                }
            });
            *snap = next;
            true
        });
        outcome
    }

    // ── Log slice ────────────────────────────────────────────────────

    /// Generic draft mutation of the log buffer. The capacity is
    /// re-applied after `f` runs.
    pub fn update_logging(&self, f: impl FnOnce(&mut LogState)) {
        self.batch(|state| {
            let logs = state.logs_mut();
            f(logs);
            logs.enforce_capacity();
        });
    }

    pub fn append_log(&self, line: impl Into<String>) {
        self.dispatch(Action::AppendLog(line.into()));
    }

    // ── UI slice ─────────────────────────────────────────────────────

    /// Generic draft mutation of the UI slice.
    pub fn update_ui(&self, f: impl FnOnce(&mut UiState)) {
        self.batch(|state| f(state.ui_mut()));
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Raw receiver of every committed snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.state.subscribe()
    }

    /// Every committed snapshot as a `Stream`, starting with the current one.
    pub fn snapshots(&self) -> WatchStream<Arc<AppState>> {
        WatchStream::new(self.state.subscribe())
    }

    /// Subscribe to a projection of the state. The subscriber wakes only
    /// when the projection differs from the last one it saw.
    pub fn select<T, F>(&self, selector: F) -> Selection<T>
    where
        T: Projection,
        F: Fn(&AppState) -> T + Send + Sync + 'static,
    {
        Selection::new(self.state.subscribe(), selector)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
