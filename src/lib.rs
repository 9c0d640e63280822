pub mod backpressure;
pub mod column;
pub mod consumer;
pub mod error;
pub mod logger;
pub mod options;
pub mod orchestrator;
pub mod types;
pub mod wire;
pub mod window;

pub use crate::error::{Error, Result};
pub use column::{ColumnType, ResolvedColumn, Schema, Store, ViewportLayout};
pub use consumer::{ConsumerStore, SliceSubscription, StoreState, subscribe_slice};
pub use options::EngineOptions;
pub use orchestrator::{Command, Event, Pump};
pub use window::DataWindow;

/// Spawns a worker endpoint on its own OS thread and returns the main-side
/// [`Pump`] wired to it, plus the `Init` command the pump should send first.
///
/// # Panics
///
/// Never panics itself; propagates any panic from the spawned worker thread
/// only when that thread is joined.
#[must_use]
pub fn start(
    schema: Vec<Schema>,
    options: EngineOptions,
) -> (orchestrator::Pump, Command, std::thread::JoinHandle<()>) {
    let init = orchestrator::init_command(schema, &options);
    let (pump, handle) = orchestrator::spawn(options);
    (pump, init, handle)
}
