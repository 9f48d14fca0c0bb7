// ── Entity model ──
//
// Typed shapes for the two documents mirrored from the backend: the
// runtime document (`RConfig`: core status + subscriptions) and the
// proxy engine document (`CoreConfig`). Unknown fields are kept in
// flattened `extra` maps so a push sends back everything a reload read.

pub mod core_config;
pub mod node;
pub mod runtime;
pub mod subscription;

mod de;

type Extra = serde_json::Map<String, serde_json::Value>;

// ── Re-exports ──────────────────────────────────────────────────────

pub use core_config::{
    CoreConfig, Dns, DnsServer, DnsServerEntry, Inbound, InboundSettings, LevelPolicy, LogConfig, Outbound,
    OutboundSettings, Policy, Routing, Rule, SOCKS_INBOUND_TAG, Sniffing, SystemPolicy, User,
    Vnext,
};
pub use node::Node;
pub use runtime::{CoreStatus, RConfig};
pub use subscription::Subscription;
