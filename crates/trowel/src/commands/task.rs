//! Run a single pipeline task.

use anyhow::{Context, Result};
use trowel_build::{runner, BuildContext, TaskKind};

pub fn run_single(kind: TaskKind, ctx: &BuildContext) -> Result<()> {
    runner::run(kind, ctx).with_context(|| format!("task {kind} failed"))?;

    Ok(())
}
