// ── Named store transitions ──
//
// The typed counterpart to the generic draft mutators. Each variant is
// applied by the pure `reduce` function; the store wraps it with a
// single notification.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::state::{AppState, apply};
use super::ui_slice::{MenuKind, Point};
use crate::model::{CoreConfig, CoreStatus, Node, RConfig};

#[derive(Debug, Clone)]
pub enum Action {
    // ── Config slice ─────────────────────────────────────────────────
    ReplaceRuntimeConfig(RConfig),
    ReplaceCoreConfig(CoreConfig),
    /// Backend-reported core status. Never dispatched optimistically.
    SetCoreStatus(CoreStatus),

    // ── Log slice ────────────────────────────────────────────────────
    AppendLog(String),

    // ── UI slice ─────────────────────────────────────────────────────
    SetNodeLoading {
        node_id: String,
        loading: bool,
        at: DateTime<Utc>,
    },
    SetSubscriptionLoading {
        url: String,
        loading: bool,
        at: DateTime<Utc>,
    },
    SetUpdateAllLoading(bool),
    OpenMenu {
        kind: MenuKind,
        anchor: Point,
        targets: Vec<Node>,
    },
    CloseMenu,
}

/// `(state, action) -> state`.
pub fn reduce(prev: &Arc<AppState>, action: Action) -> Arc<AppState> {
    apply(prev, |state| match action {
        Action::ReplaceRuntimeConfig(doc) => state.config_mut().replace_runtime(doc),
        Action::ReplaceCoreConfig(doc) => state.config_mut().replace_core(doc),
        Action::SetCoreStatus(status) => state.config_mut().rua_mut().core_status = status,
        Action::AppendLog(line) => state.logs_mut().append(line),
        Action::SetNodeLoading {
            node_id,
            loading,
            at,
        } => state
            .ui_mut()
            .loading
            .node_speed_test
            .set(node_id, loading, at),
        Action::SetSubscriptionLoading { url, loading, at } => state
            .ui_mut()
            .loading
            .subscription_update
            .set(url, loading, at),
        Action::SetUpdateAllLoading(loading) => state.ui_mut().loading.update_all = loading,
        Action::OpenMenu {
            kind,
            anchor,
            targets,
        } => state.ui_mut().open_menu(kind, anchor, targets),
        Action::CloseMenu => state.ui_mut().close_menu(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Subscription;
    use pretty_assertions::assert_eq;

    #[test]
    fn replace_runtime_discards_previous_document() {
        let first = RConfig {
            core_status: CoreStatus::Started,
            subscriptions: vec![Subscription {
                name: "old".into(),
                ..Subscription::default()
            }],
            current_id: Some("n1".into()),
            ..RConfig::default()
        };
        let second = RConfig {
            subscriptions: vec![Subscription {
                name: "new".into(),
                ..Subscription::default()
            }],
            ..RConfig::default()
        };

        let s0 = Arc::new(AppState::default());
        let s1 = reduce(&s0, Action::ReplaceRuntimeConfig(first));
        let s2 = reduce(&s1, Action::ReplaceRuntimeConfig(second.clone()));

        assert_eq!(**s2.config().rua(), second);
        assert_eq!(s2.config().rua().current_id, None);
    }

    #[test]
    fn core_status_only_touches_runtime_document() {
        let s0 = Arc::new(AppState::default());
        let s1 = reduce(&s0, Action::ReplaceCoreConfig(CoreConfig::default()));
        let s2 = reduce(&s1, Action::SetCoreStatus(CoreStatus::Restarting));

        assert_eq!(s2.config().rua().core_status, CoreStatus::Restarting);
        assert!(Arc::ptr_eq(
            s1.config().core().unwrap(),
            s2.config().core().unwrap()
        ));
    }

    #[test]
    fn node_loading_round_trip() {
        let at = Utc::now();
        let s0 = Arc::new(AppState::default());
        let s1 = reduce(
            &s0,
            Action::SetNodeLoading {
                node_id: "n1".into(),
                loading: true,
                at,
            },
        );
        assert!(s1.ui().loading.node_speed_test.is_loading("n1"));

        let s2 = reduce(
            &s1,
            Action::SetNodeLoading {
                node_id: "n1".into(),
                loading: false,
                at,
            },
        );
        assert!(!s2.ui().loading.node_speed_test.is_loading("n1"));
        assert!(s1.ui().loading.node_speed_test.is_loading("n1"));
    }

    #[test]
    fn menu_actions_drive_state_machine() {
        let s0 = Arc::new(AppState::default());
        let s1 = reduce(
            &s0,
            Action::OpenMenu {
                kind: MenuKind::Global,
                anchor: Point::new(1.0, 2.0),
                targets: Vec::new(),
            },
        );
        assert_eq!(s1.ui().menu.kind(), Some(MenuKind::Global));

        let s2 = reduce(&s1, Action::CloseMenu);
        assert!(!s2.ui().menu.is_open());
    }

    #[test]
    fn subscription_and_update_all_flags() {
        let s0 = Arc::new(AppState::default());
        let s1 = reduce(
            &s0,
            Action::SetSubscriptionLoading {
                url: "https://sub.example/a".into(),
                loading: true,
                at: Utc::now(),
            },
        );
        let s2 = reduce(&s1, Action::SetUpdateAllLoading(true));

        assert!(
            s2.ui()
                .loading
                .subscription_update
                .is_loading("https://sub.example/a")
        );
        assert!(s2.ui().loading.update_all);
        assert_eq!(s2.version(), 2);
    }
}
