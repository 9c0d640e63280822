use std::sync::{Arc, Mutex};

use crate::consumer::state::{ConsumerStore, StoreState};

/// A `(selector, equality)` pair: recomputes `selector(state)` only
/// when the snapshot reference changes, and notifies its listener only when
/// `equality` says the recomputed value actually differs from the last one
/// it saw. This lets a consumer watch one slice of `StoreState` (e.g. just
/// the visible window) without waking on unrelated field changes.
pub struct SliceSubscription<T> {
    select: Box<dyn Fn(&StoreState) -> T + Send>,
    equal: Box<dyn Fn(&T, &T) -> bool + Send>,
    last: Mutex<Option<T>>,
}

impl<T: Clone + Send + 'static> SliceSubscription<T> {
    #[must_use]
    pub fn new(
        select: impl Fn(&StoreState) -> T + Send + 'static,
        equal: impl Fn(&T, &T) -> bool + Send + 'static,
    ) -> Self {
        Self {
            select: Box::new(select),
            equal: Box::new(equal),
            last: Mutex::new(None),
        }
    }

    /// Convenience constructor for selectors whose projected value already
    /// implements `PartialEq`.
    #[must_use]
    pub fn with_eq(select: impl Fn(&StoreState) -> T + Send + 'static) -> Self
    where
        T: PartialEq,
    {
        Self::new(select, |a, b| a == b)
    }

    /// Feeds a new snapshot through the selector. Returns the projected
    /// value only when it differs (per `equal`) from the last one observed,
    /// `None` otherwise (including on the very first no-op snapshot that
    /// happens to match a default).
    pub fn observe(&self, state: &StoreState) -> Option<T> {
        let next = (self.select)(state);
        let mut last = self.last.lock().unwrap();
        let changed = match last.as_ref() {
            Some(prev) => !(self.equal)(prev, &next),
            None => true,
        };
        if !changed {
            return None;
        }
        *last = Some(next.clone());
        Some(next)
    }
}

/// Registers `subscription` against `store`, invoking `on_change` with the
/// projected slice only on the rounds `SliceSubscription::observe` reports a
/// real difference. Returns the listener id for [`ConsumerStore::unsubscribe`].
pub fn subscribe_slice<T>(
    store: &ConsumerStore,
    subscription: Arc<SliceSubscription<T>>,
    on_change: impl Fn(T) + Send + 'static,
) -> u64
where
    T: Clone + Send + 'static,
{
    store.subscribe(Box::new(move |state: &Arc<StoreState>| {
        if let Some(value) = subscription.observe(state) {
            on_change(value);
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumer::state::Status;

    #[test]
    fn only_fires_when_projected_value_changes() {
        let store = ConsumerStore::new();
        let subscription = Arc::new(SliceSubscription::with_eq(|s: &StoreState| s.total_rows));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        subscribe_slice(&store, subscription, move |value| {
            seen_clone.lock().unwrap().push(value);
        });

        store.set_status(Status::Streaming, None);
        assert!(seen.lock().unwrap().is_empty());

        store.dispatch(crate::orchestrator::Event::TotalRowsUpdated { total_rows: 5 });
        assert_eq!(*seen.lock().unwrap(), vec![5]);

        store.dispatch(crate::orchestrator::Event::TotalRowsUpdated { total_rows: 5 });
        assert_eq!(*seen.lock().unwrap(), vec![5]);

        store.dispatch(crate::orchestrator::Event::TotalRowsUpdated { total_rows: 9 });
        assert_eq!(*seen.lock().unwrap(), vec![5, 9]);
    }
}
