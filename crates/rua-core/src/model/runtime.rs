use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::de::null_as_default;
use super::node::Node;
use super::subscription::Subscription;

/// Lifecycle of the external proxy core, as reported by the backend.
///
/// Only the backend sets this; the interface never writes it
/// optimistically.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum CoreStatus {
    Started,
    Restarting,
    #[default]
    Stopped,
}

impl CoreStatus {
    pub fn is_running(self) -> bool {
        matches!(self, Self::Started)
    }
}

/// Runtime document: core status, subscriptions, and the selected node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub core_status: CoreStatus,

    /// Always an array in memory, even when the backend sends `null`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub subscriptions: Vec<Subscription>,

    /// `nodeId` of the node the backend currently routes through.
    #[serde(default, alias = "currentId", skip_serializing_if = "Option::is_none")]
    pub current_id: Option<String>,

    /// Fields this layer does not interpret, kept for round-trips.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RConfig {
    /// Every node, in subscription order then node order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.subscriptions.iter().flat_map(|sub| sub.nodes.iter())
    }

    pub fn find_node(&self, node_id: &str) -> Option<&Node> {
        self.nodes().find(|n| n.node_id == node_id)
    }

    pub fn node_count(&self) -> usize {
        self.subscriptions.iter().map(|s| s.nodes.len()).sum()
    }
}
