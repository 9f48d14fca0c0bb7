// ── Proxy engine configuration ──
//
// Typed view of the engine's JSON config. Only the `socks` inbound is
// structurally relied upon; everything else is carried as-is.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::de::null_as_default;

/// Tag of the inbound the interface is allowed to edit directly.
pub const SOCKS_INBOUND_TAG: &str = "socks";

use super::Extra;

/// The engine's full configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default, deserialize_with = "null_as_default")]
    pub inbounds: Vec<Inbound>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub outbounds: Vec<Outbound>,
    #[serde(default)]
    pub routing: Routing,
    #[serde(default)]
    pub dns: Dns,
    #[serde(default)]
    pub policy: Policy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl CoreConfig {
    pub fn inbound(&self, tag: &str) -> Option<&Inbound> {
        self.inbounds.iter().find(|i| i.tag == tag)
    }

    pub fn inbound_mut(&mut self, tag: &str) -> Option<&mut Inbound> {
        self.inbounds.iter_mut().find(|i| i.tag == tag)
    }

    /// The inbound tagged `socks`, if present.
    pub fn socks_inbound(&self) -> Option<&Inbound> {
        self.inbound(SOCKS_INBOUND_TAG)
    }

    pub fn outbound(&self, tag: &str) -> Option<&Outbound> {
        self.outbounds.iter().find(|o| o.tag == tag)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub loglevel: String,
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

// ── Inbounds ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inbound {
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub listen: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<InboundSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sniffing: Option<Sniffing>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Inbound {
    /// Proxy URL a local client would use to reach this inbound,
    /// e.g. `socks5://127.0.0.1:1080`.
    pub fn proxy_url(&self) -> String {
        let scheme = match self.protocol.as_str() {
            "http" => "http",
            _ => "socks5",
        };
        format!("{scheme}://{}:{}", self.listen, self.port)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InboundSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udp: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sniffing {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub dest_override: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

// ── Outbounds ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outbound {
    #[serde(default)]
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<OutboundSettings>,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub proxy_setting: Option<serde_json::Value>,
    #[serde(default)]
    pub mux: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutboundSettings {
    /// Sent as `null` for outbounds without servers.
    #[serde(default)]
    pub vnext: Option<Vec<Vnext>>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vnext {
    pub address: String,
    pub port: u16,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub alter_id: u32,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub security: String,
    #[serde(flatten)]
    pub extra: Extra,
}

// ── Routing ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routing {
    #[serde(default)]
    pub domain_strategy: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<Vec<String>>,
    #[serde(default)]
    pub outbound_tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Vec<String>>,
    /// `inboundTag`, `port`, `network`, `source` and the rest.
    #[serde(flatten)]
    pub extra: Extra,
}

// ── DNS ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dns {
    /// Values are a single address or a list of them.
    #[serde(default)]
    pub hosts: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub servers: Vec<DnsServer>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A DNS server entry: either a bare address or a detailed object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DnsServer {
    Address(String),
    Detailed(DnsServerEntry),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DnsServerEntry {
    pub address: String,
    /// The engine falls back to 53 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub domains: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl DnsServerEntry {
    pub const DEFAULT_PORT: u16 = 53;

    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(Self::DEFAULT_PORT)
    }
}

// ── Policy ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// Keyed by user level (`"0"`, `"1"`, ...).
    #[serde(default)]
    pub levels: BTreeMap<String, LevelPolicy>,
    #[serde(default)]
    pub system: SystemPolicy,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelPolicy {
    #[serde(default)]
    pub uplink_only: u32,
    #[serde(default)]
    pub downlink_only: u32,
    /// `handshake`, `connIdle`, `bufferSize`, ...
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemPolicy {
    #[serde(default)]
    pub stats_inbound_uplink: bool,
    #[serde(default)]
    pub stats_inbound_downlink: bool,
    #[serde(default)]
    pub stats_outbound_uplink: bool,
    #[serde(default)]
    pub stats_outbound_downlink: bool,
    #[serde(flatten)]
    pub extra: Extra,
}
