// ── Config slice ──
//
// Owns the runtime document (`rua`) and the engine document (`core`).
// Each document sits behind its own `Arc`, so an edit clones only the
// document it touches and every other reader keeps its old reference.

use std::sync::Arc;

use crate::error::CoreError;
use crate::model::{CoreConfig, Inbound, RConfig};

/// Both configuration documents as one draft-able unit.
///
/// `rua` is always present (possibly with no subscriptions); `core`
/// stays `None` until the first successful engine reload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigState {
    rua: Arc<RConfig>,
    core: Option<Arc<CoreConfig>>,
}

impl ConfigState {
    pub fn new(rua: RConfig, core: Option<CoreConfig>) -> Self {
        Self {
            rua: Arc::new(rua),
            core: core.map(Arc::new),
        }
    }

    // ── Readers ──────────────────────────────────────────────────────

    pub fn rua(&self) -> &Arc<RConfig> {
        &self.rua
    }

    pub fn core(&self) -> Option<&Arc<CoreConfig>> {
        self.core.as_ref()
    }

    pub fn has_core(&self) -> bool {
        self.core.is_some()
    }

    // ── Draft access ─────────────────────────────────────────────────

    /// Mutable view of the runtime document, cloned on first write if
    /// anyone else still holds the current version.
    pub fn rua_mut(&mut self) -> &mut RConfig {
        Arc::make_mut(&mut self.rua)
    }

    /// Mutable view of the engine document, or `None` before first load.
    pub fn core_mut(&mut self) -> Option<&mut CoreConfig> {
        self.core.as_mut().map(Arc::make_mut)
    }

    /// The `socks` inbound, ready for editing.
    ///
    /// Checks presence before drafting so a miss never clones the engine
    /// document.
    pub fn socks_inbound_mut(&mut self) -> Result<&mut Inbound, CoreError> {
        let present = self
            .core
            .as_deref()
            .is_some_and(|core| core.socks_inbound().is_some());
        if !present {
            return Err(CoreError::socks_inbound_missing());
        }
        self.core_mut()
            .and_then(|core| core.inbound_mut(crate::model::SOCKS_INBOUND_TAG))
            .ok_or_else(CoreError::socks_inbound_missing)
    }

    // ── Wholesale replacement ────────────────────────────────────────

    /// Discard the previous runtime document entirely.
    pub fn replace_runtime(&mut self, doc: RConfig) {
        self.rua = Arc::new(doc);
    }

    /// Discard the previous engine document entirely.
    pub fn replace_core(&mut self, doc: CoreConfig) {
        self.core = Some(Arc::new(doc));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Subscription;

    fn with_inbounds(tags: &[&str]) -> ConfigState {
        let inbounds = tags
            .iter()
            .enumerate()
            .map(|(i, tag)| Inbound {
                tag: (*tag).into(),
                port: 1080 + u16::try_from(i).unwrap(),
                ..Inbound::default()
            })
            .collect();
        ConfigState::new(
            RConfig::default(),
            Some(CoreConfig {
                inbounds,
                ..CoreConfig::default()
            }),
        )
    }

    #[test]
    fn default_has_runtime_but_no_core() {
        let state = ConfigState::default();
        assert!(state.rua().subscriptions.is_empty());
        assert!(!state.has_core());
    }

    #[test]
    fn rua_mut_leaves_shared_copy_untouched() {
        let mut state = ConfigState::default();
        let before = Arc::clone(state.rua());

        state.rua_mut().subscriptions.push(Subscription::default());

        assert!(before.subscriptions.is_empty());
        assert_eq!(state.rua().subscriptions.len(), 1);
        assert!(!Arc::ptr_eq(&before, state.rua()));
    }

    #[test]
    fn socks_lookup_fails_without_core() {
        let mut state = ConfigState::default();
        assert!(state.socks_inbound_mut().unwrap_err().is_not_found());
    }

    #[test]
    fn socks_lookup_miss_does_not_clone_core() {
        let mut state = with_inbounds(&["http"]);
        let before = Arc::clone(state.core().unwrap());

        assert!(state.socks_inbound_mut().is_err());
        assert!(Arc::ptr_eq(&before, state.core().unwrap()));
    }

    #[test]
    fn socks_lookup_finds_tagged_inbound() {
        let mut state = with_inbounds(&["http", "socks"]);
        state.socks_inbound_mut().unwrap().port = 9999;
        assert_eq!(state.core().unwrap().inbounds[1].port, 9999);
        assert_eq!(state.core().unwrap().inbounds[0].port, 1080);
    }
}
