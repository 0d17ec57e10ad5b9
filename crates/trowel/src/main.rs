//! Trowel CLI - static-site asset build pipeline.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use trowel_build::{BuildContext, Config, Profile, TaskKind};

mod commands;

#[derive(Parser)]
#[command(name = "trowel")]
#[command(about = "Static-site asset pipeline with a live-reloading dev server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to trowel.toml config file
    #[arg(short, long, default_value = "trowel.toml")]
    config: PathBuf,

    /// Force the production profile (minify, no source maps)
    #[arg(long)]
    production: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a starter project in the current directory
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete the output directory
    Clean,

    /// Copy static assets verbatim
    Copy,

    /// Copy images into the output directory
    Image,

    /// Copy audio/video into the output directory
    Media,

    /// Render HTML templates
    View,

    /// Compile JavaScript
    Script,

    /// Compile plain CSS
    Cssmin,

    /// Compile Sass
    Sass,

    /// Clean, then run every task
    Build,

    /// Serve the output directory and rebuild on change
    Watch,

    /// Clean, build, then watch
    Serve,

    /// Preview the built site without watching
    Preview {
        /// Port to listen on (defaults to the dev server port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let config = Config::load(&cli.config)?;
    let profile = if cli.production {
        Profile::Production
    } else {
        Profile::from_env()
    };
    let ctx = BuildContext::new(config, profile);

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(yes).await?;
        }
        Commands::Clean => commands::task::run_single(TaskKind::Clean, &ctx)?,
        Commands::Copy => commands::task::run_single(TaskKind::Copy, &ctx)?,
        Commands::Image => commands::task::run_single(TaskKind::Image, &ctx)?,
        Commands::Media => commands::task::run_single(TaskKind::Media, &ctx)?,
        Commands::View => commands::task::run_single(TaskKind::View, &ctx)?,
        Commands::Script => commands::task::run_single(TaskKind::Script, &ctx)?,
        Commands::Cssmin => commands::task::run_single(TaskKind::CssMin, &ctx)?,
        Commands::Sass => commands::task::run_single(TaskKind::Sass, &ctx)?,
        Commands::Build => {
            commands::build::run(&ctx)?;
        }
        Commands::Watch => {
            commands::watch::run(ctx).await?;
        }
        Commands::Serve => {
            commands::serve::run(ctx).await?;
        }
        Commands::Preview { port } => {
            commands::preview::run(&ctx, port).await?;
        }
    }

    Ok(())
}
