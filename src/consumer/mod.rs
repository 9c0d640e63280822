//! Consumer-facing store: the read-only view the UI layer
//! observes. Wraps the orchestrator's [`Event`](crate::orchestrator::Event)
//! stream into an immutable, reference-comparable snapshot plus slice
//! subscriptions over it.

mod selector;
mod state;

pub use selector::{SliceSubscription, subscribe_slice};
pub use state::{BackpressureInfo, ConsumerStore, Listener, Status, StoreState};
