// ── Selector subscriptions ──
//
// A subscriber picks a projection of the state tree and is woken only
// when that projection changes. Structural sharing makes the check a
// pointer comparison for `Arc` projections.

use std::sync::Arc;

use futures_core::Stream;
use tokio::sync::watch;

use crate::model::CoreStatus;
use crate::store::AppState;

/// A value that can tell whether it is the same as a previous one.
///
/// `Arc`s compare by pointer; small `Copy` values compare by value.
pub trait Projection: Clone + Send + Sync + 'static {
    fn same_as(&self, other: &Self) -> bool;
}

impl<T: ?Sized + Send + Sync + 'static> Projection for Arc<T> {
    fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: Projection> Projection for Option<T> {
    fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same_as(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<A: Projection, B: Projection> Projection for (A, B) {
    fn same_as(&self, other: &Self) -> bool {
        self.0.same_as(&other.0) && self.1.same_as(&other.1)
    }
}

macro_rules! projection_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Projection for $ty {
                fn same_as(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

projection_by_value!(bool, u64, usize, CoreStatus);

type Selector<T> = Arc<dyn Fn(&AppState) -> T + Send + Sync>;

/// A subscription to one projection of the store.
///
/// Provides point-in-time access and change notification via
/// [`changed()`](Self::changed) or by converting into a `Stream`.
pub struct Selection<T: Projection> {
    current: T,
    selector: Selector<T>,
    receiver: watch::Receiver<Arc<AppState>>,
}

impl<T: Projection> Selection<T> {
    pub(crate) fn new<F>(mut receiver: watch::Receiver<Arc<AppState>>, selector: F) -> Self
    where
        F: Fn(&AppState) -> T + Send + Sync + 'static,
    {
        let current = {
            let snap = receiver.borrow_and_update();
            selector(&snap)
        };
        Self {
            current,
            selector: Arc::new(selector),
            receiver,
        }
    }

    /// The projection last delivered (or captured at creation).
    pub fn current(&self) -> &T {
        &self.current
    }

    /// The projection of the latest snapshot, delivered or not.
    pub fn latest(&self) -> T {
        let snap = self.receiver.borrow();
        (self.selector)(&snap)
    }

    /// Wait until the projection differs from the last one delivered.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<T> {
        loop {
            self.receiver.changed().await.ok()?;
            let next = {
                let snap = self.receiver.borrow_and_update();
                (self.selector)(&snap)
            };
            if !next.same_as(&self.current) {
                self.current = next.clone();
                return Some(next);
            }
        }
    }

    /// Convert into a `Stream` of changed projections.
    pub fn into_stream(self) -> impl Stream<Item = T> + Send {
        futures_util::stream::unfold(self, |mut selection| async move {
            let next = selection.changed().await?;
            Some((next, selection))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::RConfig;
    use crate::store::Store;
    use futures_util::StreamExt;
    use tokio_test::{assert_pending, assert_ready, task};

    #[tokio::test]
    async fn wakes_on_selected_change() {
        let store = Store::new();
        let mut rua = store.select(|s| Arc::clone(s.config().rua()));

        store.replace_runtime_config(RConfig {
            current_id: Some("n1".into()),
            ..RConfig::default()
        });

        let next = rua.changed().await.unwrap();
        assert_eq!(next.current_id.as_deref(), Some("n1"));
        assert!(Arc::ptr_eq(rua.current(), &next));
    }

    #[test]
    fn ignores_changes_to_other_slices() {
        let store = Store::new();
        let mut rua = store.select(|s| Arc::clone(s.config().rua()));

        store.append_log("unrelated");
        store.update_ui(|ui| ui.tabs.setting = "3".into());

        let mut fut = task::spawn(rua.changed());
        assert_pending!(fut.poll());

        store.mutate_config(|c| c.rua_mut().current_id = Some("n2".into()));
        assert!(fut.is_woken());
        let next = assert_ready!(fut.poll()).unwrap();
        assert_eq!(next.current_id.as_deref(), Some("n2"));
    }

    #[test]
    fn value_projection_compares_by_value() {
        let store = Store::new();
        let mut flag = store.select(|s| s.ui().loading.update_all);

        store.update_ui(|ui| ui.tabs.index = "2".into());
        let mut fut = task::spawn(flag.changed());
        assert_pending!(fut.poll());

        store.update_ui(|ui| ui.loading.update_all = true);
        assert_eq!(assert_ready!(fut.poll()), Some(true));
    }

    #[tokio::test]
    async fn observes_monotonically_newer_versions() {
        let store = Arc::new(Store::new());
        let versions = store.select(AppState::version).into_stream();

        let writer = Arc::clone(&store);
        tokio::spawn(async move {
            for i in 0..20 {
                writer.append_log(format!("line {i}"));
                tokio::task::yield_now().await;
            }
        });

        let seen: Vec<u64> = versions.take_while(|v| std::future::ready(*v < 20)).collect().await;
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn ends_when_store_dropped() {
        let store = Store::new();
        let mut sel = store.select(|s| Arc::clone(s.logs()));
        drop(store);
        assert!(sel.changed().await.is_none());
    }

    #[test]
    fn latest_reads_without_consuming() {
        let store = Store::new();
        let sel = store.select(|s| s.config().rua().core_status);
        store.dispatch(crate::store::Action::SetCoreStatus(CoreStatus::Started));
        assert_eq!(sel.latest(), CoreStatus::Started);
        assert_eq!(*sel.current(), CoreStatus::Stopped);
    }
}
