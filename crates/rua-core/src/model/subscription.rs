use serde::{Deserialize, Serialize};

use super::Extra;
use super::de::null_as_default;
use super::node::Node;

/// A named remote source of proxy nodes.
///
/// Replaced wholesale whenever the runtime document reloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<Node>,
    #[serde(flatten)]
    pub extra: Extra,
}
