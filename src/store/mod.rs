//! Persisted state, one JSON file per concern.
//!  The basic idea is:
//!   - Every concern owns exactly one file under the application-data directory.
//!   - Record lists (history, todos, weights, alarms) share [json_store::JsonStore].
//!   - The weight target and the window settings are single-object stores.
//!   - Reads fall back to defaults; writes are best-effort and logged on failure.

pub mod chart;
pub mod entities;
mod file_io;
pub mod json_store;
pub mod settings;
pub mod target;
