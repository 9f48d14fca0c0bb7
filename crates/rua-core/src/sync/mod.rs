// ── Backend synchronization ──
//
// Keeps the config slice consistent with the backend's authoritative
// documents and turns backend-pushed events into store transitions.

mod events;
mod gateway;
mod notification;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub use events::{BackendEvent, spawn_event_pump};
pub use gateway::Gateway;
pub use notification::{Notification, NotificationLevel};

/// Which of the two backend documents an operation targets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// The proxy engine document (`CoreConfig`).
    Core,
    /// The application runtime document (`RConfig`).
    Runtime,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("core".parse::<DocumentKind>().unwrap(), DocumentKind::Core);
        assert_eq!("Runtime".parse::<DocumentKind>().unwrap(), DocumentKind::Runtime);
        assert!("rua".parse::<DocumentKind>().is_err());
    }
}
