//! Two cooperating endpoints connected by an ordered channel supporting
//! ownership transfer of byte buffers. `std::sync::mpsc` moving
//! owned `Vec<u8>` values gives "ownership transfer" for free: Rust's move
//! semantics already prevent the sender from touching a buffer again.

mod command;
mod event;
mod pump;
mod worker;

pub use command::Command;
pub use event::Event;
pub use pump::{AbortHandle, BatchSource, Pump};
pub use worker::Worker;

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use crate::column::Schema;
use crate::options::EngineOptions;

/// Spawns the worker on a dedicated OS thread and returns a [`Pump`] wired
/// to it, plus the thread's `JoinHandle` for clean shutdown.
#[must_use]
pub fn spawn(options: EngineOptions) -> (Pump, JoinHandle<()>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    let (event_tx, event_rx) = mpsc::channel::<Event>();
    let handle = thread::spawn(move || {
        Worker::new(&options).run(&cmd_rx, &event_tx);
    });
    (Pump::new(cmd_tx, event_rx), handle)
}

/// Convenience constructor for the `Init` command, drawing its
/// layout hints from `options`.
#[must_use]
pub fn init_command(schema: Vec<Schema>, options: &EngineOptions) -> Command {
    Command::Init {
        schema,
        char_width_hint: options.char_width_hint(),
        row_height_hint: options.row_height_hint(),
        viewport_height: options.viewport_height(),
    }
}
