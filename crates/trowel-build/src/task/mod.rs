//! Pipeline tasks.
//!
//! Each task discovers its inputs under the source (or static) tree, runs
//! them through a transform, and writes into the output tree preserving
//! relative paths. Tasks share no state; they only write disjoint file sets
//! into the same output directory.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

pub mod clean;
pub mod copy;
pub mod media;
pub mod script;
pub mod style;
pub mod view;

/// What a finished task did.
#[derive(Debug, Clone, Copy)]
pub struct TaskSummary {
    /// Files written (or removed, for clean).
    pub files: usize,

    /// Wall-clock duration.
    pub duration_ms: u64,
}

/// Errors from a task run.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to render {path}: {message}")]
    Render { path: PathBuf, message: String },

    #[error(transparent)]
    Script(#[from] trowel_assets::ScriptError),

    #[error(transparent)]
    Style(#[from] trowel_assets::StyleError),
}

/// Collect files under `root` matching `predicate`. A missing root is empty,
/// not an error.
pub(crate) fn files_under(root: &Path, predicate: impl Fn(&Path) -> bool) -> Vec<PathBuf> {
    if !root.exists() {
        return Vec::new();
    }

    WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| predicate(p))
        .collect()
}

pub(crate) fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// `_`-prefixed files are partials: consumed by includes, never emitted.
pub(crate) fn is_partial(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('_'))
        .unwrap_or(false)
}

pub(crate) fn read_file(path: &Path) -> Result<String, TaskError> {
    fs::read_to_string(path).map_err(|e| TaskError::Read {
        path: path.to_path_buf(),
        source: e,
    })
}

pub(crate) fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), TaskError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| TaskError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(path, contents).map_err(|e| TaskError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Relative path as a forward-slash name, for template lookup and map
/// sources.
pub(crate) fn relative_name(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
