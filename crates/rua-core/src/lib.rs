// rua-core: Reactive config state between the rua backend and its front ends.

pub mod backend;
pub mod config;
pub mod error;
pub mod model;
pub mod store;
pub mod stream;
pub mod sync;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::{Backend, HttpBackend, UpdateConfig};
pub use config::GatewayConfig;
pub use error::{CoreError, SyncError, SyncErrorKind};
pub use store::{Action, AppState, Store};
pub use stream::{Projection, Selection};
pub use sync::{
    BackendEvent, DocumentKind, Gateway, Notification, NotificationLevel, spawn_event_pump,
};
pub use view::{Connectivity, NodeRow, NodeView, RowEvent, SortOrder, StatusBadge};

// Re-export model types at the crate root for ergonomics.
pub use model::{CoreConfig, CoreStatus, Inbound, Node, RConfig, Subscription};
