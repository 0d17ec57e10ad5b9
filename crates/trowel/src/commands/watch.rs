//! Watch command: dev server over the existing output.

use anyhow::Result;
use trowel_build::BuildContext;
use trowel_server::DevServer;

/// Run the dev server without an initial build.
pub async fn run(ctx: BuildContext) -> Result<()> {
    tracing::info!(
        "Starting development server on port {}",
        ctx.config.dev.port
    );

    DevServer::new(ctx).start().await?;

    Ok(())
}
