// ── Composed application state ──
//
// One immutable tree holding the three slices. Every commit produces a
// new root; slices that were not touched keep their previous `Arc`, so
// a pointer comparison tells a subscriber whether its part changed.

use std::sync::Arc;

use super::config_slice::ConfigState;
use super::log_slice::LogState;
use super::ui_slice::UiState;

#[derive(Debug, Clone, Default)]
pub struct AppState {
    version: u64,
    config: Arc<ConfigState>,
    logs: Arc<LogState>,
    ui: Arc<UiState>,
}

impl AppState {
    pub fn new(log_capacity: Option<usize>) -> Self {
        Self {
            version: 0,
            config: Arc::default(),
            logs: Arc::new(LogState::with_capacity(log_capacity)),
            ui: Arc::default(),
        }
    }

    /// Number of commits that led to this snapshot.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn config(&self) -> &Arc<ConfigState> {
        &self.config
    }

    pub fn logs(&self) -> &Arc<LogState> {
        &self.logs
    }

    pub fn ui(&self) -> &Arc<UiState> {
        &self.ui
    }

    // ── Draft access (copy-on-write) ─────────────────────────────────

    pub fn config_mut(&mut self) -> &mut ConfigState {
        Arc::make_mut(&mut self.config)
    }

    pub fn logs_mut(&mut self) -> &mut LogState {
        Arc::make_mut(&mut self.logs)
    }

    pub fn ui_mut(&mut self) -> &mut UiState {
        Arc::make_mut(&mut self.ui)
    }
}

/// Pure transition: run `f` against a draft of `prev` and return the next
/// snapshot. `prev` is never modified.
pub fn apply(prev: &Arc<AppState>, f: impl FnOnce(&mut AppState)) -> Arc<AppState> {
    let mut next = AppState::clone(prev);
    f(&mut next);
    next.version = prev.version + 1;
    Arc::new(next)
}
