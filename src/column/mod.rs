//! Growable columnar storage: one column per schema entry,
//! created at `INIT` and living for the store's lifetime.

mod list_utf8;
mod numeric;
mod schema;
mod store;
mod utf8;

pub use schema::{ColumnType, ResolvedColumn, Schema, ViewportLayout, resolve_columns};
pub use store::{CommitOutcome, Store};
