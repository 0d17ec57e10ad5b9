//! Full build command.

use anyhow::Result;
use trowel_build::BuildContext;

/// Run the build command: clean, then every task in parallel.
pub fn run(ctx: &BuildContext) -> Result<()> {
    tracing::info!(
        "Building site ({} profile)...",
        if ctx.profile.is_production() {
            "production"
        } else {
            "development"
        }
    );

    let summary = trowel_build::build(ctx)?;

    tracing::info!(
        "Ran {} tasks over {} files in {}ms",
        summary.tasks,
        summary.files,
        summary.duration_ms
    );

    tracing::info!("Output: {}", ctx.out_dir().display());

    Ok(())
}
