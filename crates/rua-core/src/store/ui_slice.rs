// ── UI slice ──
//
// Ephemeral interaction state: the context menu, per-entity loading
// flags, and tab selection. Nothing here survives a restart or round-trips
// through the backend.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::model::Node;

/// Which context menu is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MenuKind {
    Global,
    Node,
}

/// Screen coordinates of the pointer that opened a menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Context menu state machine: `Closed` or `Open(kind, anchor, targets)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MenuState {
    #[default]
    Closed,
    Open {
        kind: MenuKind,
        anchor: Point,
        /// Entities under the pointer when the menu opened.
        targets: Vec<Node>,
    },
}

impl MenuState {
    pub fn kind(&self) -> Option<MenuKind> {
        match self {
            Self::Closed => None,
            Self::Open { kind, .. } => Some(*kind),
        }
    }

    pub fn anchor(&self) -> Option<Point> {
        match self {
            Self::Closed => None,
            Self::Open { anchor, .. } => Some(*anchor),
        }
    }

    pub fn targets(&self) -> &[Node] {
        match self {
            Self::Closed => &[],
            Self::Open { targets, .. } => targets,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

// ── Loading flags ────────────────────────────────────────────────────

/// An in-flight async operation for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingFlag {
    pub started_at: DateTime<Utc>,
}

/// Loading flags keyed by entity id.
///
/// Presence means in flight; absence means idle. The flags are advisory:
/// they drive the display and never block a second request for the same id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingMap {
    flags: HashMap<String, LoadingFlag>,
}

impl LoadingMap {
    /// Set or clear the flag for `id`. Clearing an idle id is a no-op.
    pub fn set(&mut self, id: impl Into<String>, loading: bool, at: DateTime<Utc>) {
        let id = id.into();
        if loading {
            self.flags.insert(id, LoadingFlag { started_at: at });
        } else {
            self.flags.remove(&id);
        }
    }

    pub fn start(&mut self, id: impl Into<String>) {
        self.set(id, true, Utc::now());
    }

    pub fn finish(&mut self, id: &str) {
        self.flags.remove(id);
    }

    pub fn is_loading(&self, id: &str) -> bool {
        self.flags.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&LoadingFlag> {
        self.flags.get(id)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Clear flags that started more than `ttl` before `now`.
    /// Returns the expired ids.
    pub fn expire_older_than(&mut self, now: DateTime<Utc>, ttl: Duration) -> Vec<String> {
        let stale: Vec<String> = self
            .flags
            .iter()
            .filter(|(_, flag)| now - flag.started_at > ttl)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &stale {
            self.flags.remove(id);
        }
        stale
    }
}

/// Every loading indicator the interface shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingState {
    /// "Update all subscriptions" in flight.
    pub update_all: bool,
    /// Node connectivity/speed probes, keyed by `nodeId`.
    pub node_speed_test: LoadingMap,
    /// Single-subscription refreshes, keyed by subscription URL.
    pub subscription_update: LoadingMap,
}

/// Selected tab per tabbed view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tabs {
    pub index: String,
    pub setting: String,
}

impl Default for Tabs {
    fn default() -> Self {
        Self {
            index: "1".into(),
            setting: "1".into(),
        }
    }
}

// ── UiState ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    pub menu: MenuState,
    pub loading: LoadingState,
    pub tabs: Tabs,
}

impl UiState {
    /// `closed -> open(kind, anchor, targets)`. Reopening replaces the
    /// previous menu.
    pub fn open_menu(&mut self, kind: MenuKind, anchor: Point, targets: Vec<Node>) {
        self.menu = MenuState::Open {
            kind,
            anchor,
            targets,
        };
    }

    /// `open -> closed`.
    pub fn close_menu(&mut self) {
        self.menu = MenuState::Closed;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn menu_opens_and_closes() {
        let mut ui = UiState::default();
        assert!(!ui.menu.is_open());

        let node = Node {
            node_id: "n1".into(),
            ..Node::default()
        };
        ui.open_menu(MenuKind::Node, Point::new(12.0, 34.0), vec![node]);
        assert_eq!(ui.menu.kind(), Some(MenuKind::Node));
        assert_eq!(ui.menu.anchor(), Some(Point::new(12.0, 34.0)));
        assert_eq!(ui.menu.targets().len(), 1);

        ui.close_menu();
        assert_eq!(ui.menu, MenuState::Closed);
        assert!(ui.menu.targets().is_empty());
    }

    #[test]
    fn loading_flags_track_many_ids() {
        let mut map = LoadingMap::default();
        map.start("a");
        map.start("b");
        assert!(map.is_loading("a"));
        assert!(map.is_loading("b"));
        assert!(!map.is_loading("c"));

        map.set("a", false, Utc::now());
        assert!(!map.is_loading("a"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn restarting_a_flag_refreshes_its_start_time() {
        let mut map = LoadingMap::default();
        let t0 = Utc::now();
        map.set("a", true, t0);
        map.set("a", true, t0 + Duration::seconds(5));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a").unwrap().started_at, t0 + Duration::seconds(5));
    }

    #[test]
    fn expire_clears_only_stale_flags() {
        let mut map = LoadingMap::default();
        let now = Utc::now();
        map.set("old", true, now - Duration::seconds(60));
        map.set("fresh", true, now - Duration::seconds(1));

        let expired = map.expire_older_than(now, Duration::seconds(30));
        assert_eq!(expired, ["old"]);
        assert!(map.is_loading("fresh"));
        assert!(!map.is_loading("old"));
    }

    #[test]
    fn tabs_default_to_first() {
        let tabs = Tabs::default();
        assert_eq!(tabs.index, "1");
        assert_eq!(tabs.setting, "1");
    }
}
