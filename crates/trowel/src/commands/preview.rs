//! Preview server command.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::services::ServeDir;
use trowel_build::BuildContext;

/// Serve the built output directory, without watching or reloading.
pub async fn run(ctx: &BuildContext, port: Option<u16>) -> Result<()> {
    let dir = ctx.out_dir();
    if !dir.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'trowel build' first.",
            dir.display()
        );
    }

    let port = port.unwrap_or(ctx.config.dev.port);
    let addr: SocketAddr = format!("{}:{}", ctx.config.dev.host, port)
        .parse()
        .context("Invalid address")?;

    tracing::info!("Serving {} at http://{}", dir.display(), addr);

    let app = Router::new().fallback_service(ServeDir::new(dir));

    let listener = tokio::net::TcpListener::bind(addr).await?;

    if ctx.config.dev.open {
        let url = format!("http://{}", addr);
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;

    Ok(())
}
