//! Scaffold a starter project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(yes: bool) -> Result<()> {
    tracing::info!("Initializing trowel project...");

    let src_dir = Path::new("src");

    if src_dir.exists() {
        if !yes {
            tracing::warn!("src/ directory already exists. Use --yes to overwrite.");
            return Ok(());
        }
    } else {
        fs::create_dir_all(src_dir).context("Failed to create src directory")?;
    }

    // Create default config
    let config_path = Path::new("trowel.toml");
    if !config_path.exists() || yes {
        fs::write(config_path, DEFAULT_CONFIG).context("Failed to write trowel.toml")?;
        tracing::info!("Created trowel.toml");
    }

    // Create starter page and partial
    let index_path = src_dir.join("index.html");
    if !index_path.exists() || yes {
        fs::write(&index_path, DEFAULT_INDEX).context("Failed to write index.html")?;
        tracing::info!("Created src/index.html");
    }

    let header_path = src_dir.join("_header.html");
    if !header_path.exists() || yes {
        fs::write(&header_path, DEFAULT_HEADER).context("Failed to write _header.html")?;
        tracing::info!("Created src/_header.html");
    }

    // Create starter script and stylesheet
    let script_path = src_dir.join("app.js");
    if !script_path.exists() || yes {
        fs::write(&script_path, DEFAULT_SCRIPT).context("Failed to write app.js")?;
        tracing::info!("Created src/app.js");
    }

    let style_path = src_dir.join("style.scss");
    if !style_path.exists() || yes {
        fs::write(&style_path, DEFAULT_STYLE).context("Failed to write style.scss")?;
        tracing::info!("Created src/style.scss");
    }

    // Create the static directory
    let public_dir = Path::new("public");
    if !public_dir.exists() {
        fs::create_dir_all(public_dir).context("Failed to create public directory")?;
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'trowel serve' to start the development server.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Trowel configuration

[paths]
# Source tree with templates, scripts and stylesheets
src = "src"

# Output directory (erased by the clean task)
out = "dist"

# Pre-built assets copied verbatim (vendored libraries and the like)
public = "public"

[dev]
port = 3000
host = "127.0.0.1"

# Open the browser when the dev server starts
open = false

[build]
# ECMAScript target for the script task
js_target = "es2015"
"#;

const DEFAULT_INDEX: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Trowel starter</title>
  <link rel="stylesheet" href="/style.css">
</head>
<body>
  {% include "_header.html" %}
  <main>
    <p>Edit src/index.html and save to see the page reload.</p>
  </main>
  <script src="/app.js" type="module"></script>
</body>
</html>
"#;

const DEFAULT_HEADER: &str = r#"<header>
  <h1>Trowel starter</h1>
</header>
"#;

const DEFAULT_SCRIPT: &str = r#"const started = new Date();

console.log(`page built with trowel, loaded at ${started.toLocaleTimeString()}`);
"#;

const DEFAULT_STYLE: &str = r#"$accent: #336699;

body {
  font-family: system-ui, sans-serif;
  margin: 2rem auto;
  max-width: 40rem;

  header h1 {
    color: $accent;
  }
}
"#;
