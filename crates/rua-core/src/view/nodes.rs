// ── Node table projection ──
//
// Derives display rows from a store snapshot. Row order is subscription
// order then node order; the only reordering is the explicit name sort.

use std::fmt;

use strum::Display;

use super::columns::{ColumnKey, ColumnLayout};
use crate::error::CoreError;
use crate::model::Node;
use crate::store::{Action, AppState, LoadingMap, MenuKind, Point, Store};
use crate::sync::Gateway;

/// Stable row identity: address followed by display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowKey(String);

impl RowKey {
    pub fn of(node: &Node) -> Self {
        Self(format!("{}{}", node.add, node.ps))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-row connectivity indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Connectivity {
    /// A probe for this node is in flight. Wins over any stored result.
    Probing,
    /// Never probed.
    Unknown,
    Reachable,
    Unreachable,
}

impl Connectivity {
    pub fn of(node: &Node, probes: &LoadingMap) -> Self {
        if probes.is_loading(&node.node_id) {
            return Self::Probing;
        }
        match node.connectivity {
            None => Self::Unknown,
            Some(true) => Self::Reachable,
            Some(false) => Self::Unreachable,
        }
    }
}

/// One display row.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRow {
    /// 1-based position in the displayed order.
    pub index: usize,
    pub key: RowKey,
    pub node: Node,
    pub connectivity: Connectivity,
    /// The backend currently routes through this node.
    pub is_current: bool,
}

impl NodeRow {
    pub fn delay_label(&self) -> Option<String> {
        self.node.delay.map(|d| format!("{d}ms"))
    }

    pub fn speed_label(&self) -> Option<String> {
        self.node.speed.map(|s| format!("{s}MB/s"))
    }
}

/// Name column sort state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Unsorted,
    Ascending,
    Descending,
}

impl SortOrder {
    /// `Unsorted -> Ascending -> Descending -> Unsorted`.
    pub fn next(self) -> Self {
        match self {
            Self::Unsorted => Self::Ascending,
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Unsorted,
        }
    }
}

/// Pointer or keyboard activity on a row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowEvent {
    /// Double click / enter: select the node on the backend.
    DoubleActivate,
    /// Secondary click at `anchor`: open the node context menu.
    ContextMenu { anchor: Point },
}

/// View-local state of the node table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeView {
    columns: ColumnLayout,
    sort: SortOrder,
}

impl NodeView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &ColumnLayout {
        &self.columns
    }

    pub fn resize_column(&mut self, key: ColumnKey, width: u32) -> u32 {
        self.columns.resize(key, width)
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    /// Advance the name column sort and return the new order.
    pub fn toggle_name_sort(&mut self) -> SortOrder {
        self.sort = self.sort.next();
        self.sort
    }

    /// Rows for `state`, in display order.
    pub fn project(&self, state: &AppState) -> Vec<NodeRow> {
        let rua = state.config().rua();
        let probes = &state.ui().loading.node_speed_test;
        let current = rua.current_id.as_deref();

        let mut nodes: Vec<&Node> = rua.nodes().collect();
        match self.sort {
            SortOrder::Unsorted => {}
            SortOrder::Ascending => nodes.sort_by(|a, b| a.ps.cmp(&b.ps)),
            SortOrder::Descending => nodes.sort_by(|a, b| b.ps.cmp(&a.ps)),
        }

        nodes
            .into_iter()
            .enumerate()
            .map(|(i, node)| NodeRow {
                index: i + 1,
                key: RowKey::of(node),
                connectivity: Connectivity::of(node, probes),
                is_current: current.is_some_and(|id| id == node.node_id),
                node: node.clone(),
            })
            .collect()
    }

    /// Route a row event. The event is fully consumed here: callers should
    /// not fall through to any default handling.
    pub async fn handle_row_event(
        &self,
        gateway: &Gateway,
        row: &NodeRow,
        event: RowEvent,
    ) -> Result<(), CoreError> {
        match event {
            RowEvent::DoubleActivate => gateway.select_node(&row.node.node_id).await,
            RowEvent::ContextMenu { anchor } => {
                open_node_menu(gateway.store(), vec![row.node.clone()], anchor);
                Ok(())
            }
        }
    }
}

/// Record the clicked rows and pointer position, then open the node menu.
pub fn open_node_menu(store: &Store, targets: Vec<Node>, anchor: Point) {
    store.dispatch(Action::OpenMenu {
        kind: MenuKind::Node,
        anchor,
        targets,
    });
}
