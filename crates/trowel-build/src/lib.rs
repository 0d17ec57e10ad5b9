//! Task wiring for the trowel asset pipeline.
//!
//! Declarative tasks route source files through the transforms in
//! `trowel-assets`: clean, copy, image/media copy, view (templates),
//! script (JavaScript), cssmin and sass (stylesheets). The runner fans the
//! independent tasks out in parallel after a sequential clean.

pub mod config;
pub mod runner;
pub mod task;

pub use config::{BuildContext, Config, ConfigError, Profile};
pub use runner::{build, run, BuildError, BuildSummary, TaskKind};
pub use task::{TaskError, TaskSummary};
