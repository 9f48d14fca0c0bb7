// ── Node view projection ──

mod columns;
mod nodes;

use strum::Display;

use crate::model::CoreStatus;

pub use columns::{Column, ColumnKey, ColumnLayout, MIN_COLUMN_WIDTH};
pub use nodes::{
    Connectivity, NodeRow, NodeView, RowEvent, RowKey, SortOrder, open_node_menu,
};

/// How the core status badge is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum StatusBadge {
    /// Solid green dot.
    Running,
    /// Spinner.
    Busy,
    /// Solid red dot.
    Down,
}

impl From<CoreStatus> for StatusBadge {
    fn from(status: CoreStatus) -> Self {
        match status {
            CoreStatus::Started => Self::Running,
            CoreStatus::Restarting => Self::Busy,
            CoreStatus::Stopped => Self::Down,
        }
    }
}
