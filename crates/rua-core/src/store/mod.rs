// ── Reactive state store ──
//
// Three slices (config, log, UI) composed into one copy-on-write tree
// with push-based change notification via a `watch` channel.

mod action;
mod composer;
mod config_slice;
mod log_slice;
mod state;
mod ui_slice;

pub use action::{Action, reduce};
pub use composer::Store;
pub use config_slice::ConfigState;
pub use log_slice::LogState;
pub use state::{AppState, apply};
pub use ui_slice::{
    LoadingFlag, LoadingMap, LoadingState, MenuKind, MenuState, Point, Tabs, UiState,
};
