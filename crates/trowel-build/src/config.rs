//! Project configuration and build profile.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variable selecting the build profile.
pub const PROFILE_ENV_VAR: &str = "TROWEL_ENV";

/// Configuration file structure (trowel.toml).
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub dev: Dev,
    #[serde(default)]
    pub build: BuildSettings,
}

/// Source, output and static directories.
#[derive(Debug, Clone, Deserialize)]
pub struct Paths {
    /// Source tree with templates, scripts and stylesheets.
    #[serde(default = "default_src")]
    pub src: PathBuf,

    /// Output directory; fully owned and erased by the clean task.
    #[serde(default = "default_out")]
    pub out: PathBuf,

    /// Pre-built assets copied verbatim (vendored libraries and the like).
    #[serde(default = "default_public")]
    pub public: PathBuf,
}

/// Development server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Dev {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Open the browser when the dev server starts.
    #[serde(default)]
    pub open: bool,
}

/// Build settings independent of the profile.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSettings {
    /// ECMAScript target for the script task.
    #[serde(default = "default_js_target")]
    pub js_target: String,
}

fn default_src() -> PathBuf {
    PathBuf::from("src")
}
fn default_out() -> PathBuf {
    PathBuf::from("dist")
}
fn default_public() -> PathBuf {
    PathBuf::from("public")
}
fn default_port() -> u16 {
    3000
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_js_target() -> String {
    "es2015".to_string()
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            src: default_src(),
            out: default_out(),
            public: default_public(),
        }
    }
}

impl Default for Dev {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            open: false,
        }
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            js_target: default_js_target(),
        }
    }
}

/// Errors loading trowel.toml.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

impl Config {
    /// Load configuration from `path` if it exists; defaults otherwise.
    /// A present but malformed file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Build profile, toggling minification and source-map emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Development,
    Production,
}

impl Profile {
    /// Read the profile from the `TROWEL_ENV` environment variable.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(PROFILE_ENV_VAR).ok().as_deref())
    }

    /// `"production"` selects Production; anything else Development.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some("production") => Profile::Production,
            _ => Profile::Development,
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, Profile::Production)
    }

    /// Minification is a production concern.
    pub fn minify(self) -> bool {
        self.is_production()
    }

    /// Source maps are a development concern.
    pub fn source_maps(self) -> bool {
        !self.is_production()
    }
}

/// Everything a task needs to run.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub config: Config,
    pub profile: Profile,
}

impl BuildContext {
    pub fn new(config: Config, profile: Profile) -> Self {
        Self { config, profile }
    }

    pub fn src_dir(&self) -> &Path {
        &self.config.paths.src
    }

    pub fn out_dir(&self) -> &Path {
        &self.config.paths.out
    }

    pub fn public_dir(&self) -> &Path {
        &self.config.paths.public
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_project_layout() {
        let config = Config::default();

        assert_eq!(config.paths.src, PathBuf::from("src"));
        assert_eq!(config.paths.out, PathBuf::from("dist"));
        assert_eq!(config.paths.public, PathBuf::from("public"));
        assert_eq!(config.dev.port, 3000);
        assert!(!config.dev.open);
        assert_eq!(config.build.js_target, "es2015");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempdir().unwrap();

        let config = Config::load(&temp.path().join("trowel.toml")).unwrap();

        assert_eq!(config.paths.out, PathBuf::from("dist"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("trowel.toml");
        fs::write(&path, "[paths]\nout = \"build\"\n\n[dev]\nport = 8080\n").unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.paths.out, PathBuf::from("build"));
        assert_eq!(config.paths.src, PathBuf::from("src"));
        assert_eq!(config.dev.port, 8080);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("trowel.toml");
        fs::write(&path, "[paths\nout=").unwrap();

        let result = Config::load(&path);

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn profile_from_env_value() {
        assert_eq!(
            Profile::from_env_value(Some("production")),
            Profile::Production
        );
        assert_eq!(
            Profile::from_env_value(Some("development")),
            Profile::Development
        );
        assert_eq!(Profile::from_env_value(None), Profile::Development);
    }

    #[test]
    fn profile_toggles_minify_and_maps() {
        assert!(Profile::Production.minify());
        assert!(!Profile::Production.source_maps());
        assert!(!Profile::Development.minify());
        assert!(Profile::Development.source_maps());
    }
}
