//! Task dispatch and the build fan-out.

use std::fmt;
use std::time::Instant;

use rayon::prelude::*;

use crate::config::BuildContext;
use crate::task::{self, TaskError, TaskSummary};

/// The pipeline tasks, named as they appear on the command line and in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Clean,
    Copy,
    Image,
    Media,
    View,
    Script,
    CssMin,
    Sass,
}

impl TaskKind {
    /// The independent tasks run in parallel after clean.
    pub const BUILD_GROUP: &'static [TaskKind] = &[
        TaskKind::Copy,
        TaskKind::Image,
        TaskKind::Media,
        TaskKind::View,
        TaskKind::Script,
        TaskKind::CssMin,
        TaskKind::Sass,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TaskKind::Clean => "clean",
            TaskKind::Copy => "copy",
            TaskKind::Image => "image",
            TaskKind::Media => "media",
            TaskKind::View => "view",
            TaskKind::Script => "script",
            TaskKind::CssMin => "cssmin",
            TaskKind::Sass => "sass",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors from a build run.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("clean failed: {0}")]
    Clean(#[source] TaskError),

    #[error("tasks failed: {}", .0.join(", "))]
    TasksFailed(Vec<&'static str>),
}

/// What a finished build did.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildSummary {
    pub tasks: usize,
    pub files: usize,
    pub duration_ms: u64,
}

/// Run one task, with timing and a task-identifying log line.
pub fn run(kind: TaskKind, ctx: &BuildContext) -> Result<TaskSummary, TaskError> {
    let start = Instant::now();
    tracing::debug!(task = kind.name(), "task starting");

    let files = match kind {
        TaskKind::Clean => task::clean::run(ctx),
        TaskKind::Copy => task::copy::run(ctx),
        TaskKind::Image => task::media::run_image(ctx),
        TaskKind::Media => task::media::run_media(ctx),
        TaskKind::View => task::view::run(ctx),
        TaskKind::Script => task::script::run(ctx),
        TaskKind::CssMin => task::style::run_css(ctx),
        TaskKind::Sass => task::style::run_sass(ctx),
    }?;

    let summary = TaskSummary {
        files,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    tracing::info!(
        task = kind.name(),
        files = summary.files,
        duration_ms = summary.duration_ms,
        "task finished"
    );

    Ok(summary)
}

/// Clean, then fan the independent tasks out in parallel.
///
/// A failing task is logged and does not halt its siblings; once the whole
/// group has finished, any failures surface as [`BuildError::TasksFailed`].
pub fn build(ctx: &BuildContext) -> Result<BuildSummary, BuildError> {
    let start = Instant::now();

    run(TaskKind::Clean, ctx).map_err(BuildError::Clean)?;

    let results: Vec<(TaskKind, Result<TaskSummary, TaskError>)> = TaskKind::BUILD_GROUP
        .par_iter()
        .map(|kind| (*kind, run(*kind, ctx)))
        .collect();

    let mut summary = BuildSummary::default();
    let mut failed = Vec::new();

    for (kind, result) in results {
        match result {
            Ok(task_summary) => {
                summary.tasks += 1;
                summary.files += task_summary.files;
            }
            Err(e) => {
                tracing::error!(task = kind.name(), error = %e, "task failed");
                failed.push(kind.name());
            }
        }
    }

    summary.duration_ms = start.elapsed().as_millis() as u64;

    if !failed.is_empty() {
        return Err(BuildError::TasksFailed(failed));
    }

    Ok(summary)
}
