use serde::{Deserialize, Serialize};

use super::Extra;
use super::de::string_or_number;

/// One proxy endpoint decoded from a subscription.
///
/// The interface never edits these fields; nodes change only when a
/// subscription reloads or the backend reports probe results
/// (`delay`, `speed`, `connectivity`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(default, deserialize_with = "string_or_number")]
    pub v: String,
    /// Display name.
    #[serde(default)]
    pub ps: String,
    /// Server address.
    #[serde(default)]
    pub add: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub port: String,
    /// User id used by the protocol.
    #[serde(default)]
    pub id: String,
    /// Alter id.
    #[serde(default, deserialize_with = "string_or_number")]
    pub aid: String,
    #[serde(default)]
    pub net: String,
    /// Protocol type.
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub tls: String,
    #[serde(default)]
    pub sni: String,
    #[serde(default)]
    pub alpn: String,
    /// Owning subscription tag.
    #[serde(default)]
    pub subs: String,
    /// Measured latency in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
    /// Measured download speed in MB/s.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Result of the last probe; `None` until one finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connectivity: Option<bool>,
    /// Backend correlation id for selection and probes.
    #[serde(default)]
    pub node_id: String,
    /// Protocol fields not modelled above (`scy`, `fp`, ...).
    #[serde(flatten)]
    pub extra: Extra,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_numeric_port_and_aid() {
        let node: Node = serde_json::from_value(json!({
            "ps": "tokyo-01",
            "add": "jp.example.com",
            "port": 443,
            "aid": 0,
            "type": "none",
            "nodeId": "n1"
        }))
        .unwrap();

        assert_eq!(node.port, "443");
        assert_eq!(node.aid, "0");
        assert_eq!(node.kind, "none");
        assert_eq!(node.node_id, "n1");
        assert_eq!(node.delay, None);
    }

    #[test]
    fn unmodelled_protocol_fields_survive_round_trip() {
        let doc = json!({
            "v": "2",
            "ps": "tokyo-01",
            "add": "jp.example.com",
            "port": "443",
            "id": "b831381d-6324-4d53-ad4f-8cda48b30811",
            "aid": "0",
            "net": "ws",
            "type": "none",
            "host": "jp.example.com",
            "path": "/ray",
            "tls": "tls",
            "sni": "",
            "alpn": "",
            "subs": "main",
            "delay": 120,
            "nodeId": "n1",
            "scy": "auto",
            "fp": "chrome"
        });

        let node: Node = serde_json::from_value(doc.clone()).unwrap();
        assert_eq!(node.extra.get("scy"), Some(&json!("auto")));

        pretty_assertions::assert_eq!(serde_json::to_value(&node).unwrap(), doc);
    }

    #[test]
    fn probe_fields_are_omitted_until_measured() {
        let node = Node {
            ps: "a".into(),
            ..Node::default()
        };
        let value = serde_json::to_value(&node).unwrap();
        assert!(value.get("delay").is_none());
        assert!(value.get("connectivity").is_none());
        assert_eq!(value["nodeId"], "");
    }
}
