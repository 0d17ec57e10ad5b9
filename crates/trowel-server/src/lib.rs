//! Development server for the trowel pipeline.
//!
//! Serves the output directory with a live-reload script injected into HTML,
//! watches the source trees, and re-runs the matching task on change.

pub mod reload;
pub mod server;
pub mod watcher;

pub use reload::{ReloadHub, ReloadMessage};
pub use server::{DevServer, ServerError};
pub use watcher::{classify_path, FileWatcher};
