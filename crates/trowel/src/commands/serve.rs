//! Serve command: clean, build, then watch.

use anyhow::Result;
use trowel_build::BuildContext;
use trowel_server::DevServer;

/// Run the full development flow.
///
/// A partially failed initial build still serves whatever was written; the
/// watch loop rebuilds on the next save.
pub async fn run(ctx: BuildContext) -> Result<()> {
    if let Err(e) = trowel_build::build(&ctx) {
        tracing::error!(error = %e, "initial build incomplete");
    }

    tracing::info!(
        "Starting development server on port {}",
        ctx.config.dev.port
    );

    DevServer::new(ctx).start().await?;

    Ok(())
}
