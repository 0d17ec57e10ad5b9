//! File watching for the dev server.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

use trowel_build::task::media::{IMAGE_EXTENSIONS, MEDIA_EXTENSIONS};
use trowel_build::TaskKind;

/// File watcher for detecting source changes.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Create a new file watcher for the given paths.
    ///
    /// Returns the watcher and a channel of changed paths.
    pub fn new(
        paths: &[PathBuf],
    ) -> Result<(Self, async_mpsc::Receiver<PathBuf>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        for path in paths {
            if path.exists() {
                watcher
                    .watch(path, RecursiveMode::Recursive)
                    .map_err(std::io::Error::other)?;
            }
        }

        // Forward events onto the async channel, collapsing bursts.
        let async_tx_clone = async_tx.clone();
        std::thread::spawn(move || {
            let mut last_event_time = std::time::Instant::now();
            let debounce_duration = Duration::from_millis(100);

            while let Ok(event) = sync_rx.recv() {
                let now = std::time::Instant::now();
                if now.duration_since(last_event_time) < debounce_duration {
                    continue;
                }
                last_event_time = now;

                if !is_change(&event.kind) {
                    continue;
                }

                for path in event.paths {
                    let _ = async_tx_clone.blocking_send(path);
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

fn is_change(kind: &notify::EventKind) -> bool {
    use notify::EventKind;

    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

/// Map a changed path to the task that rebuilds it.
///
/// Anything under the static tree re-runs copy; everything else is routed by
/// extension. Unrecognized paths (editor droppings, lockfiles) map to None.
pub fn classify_path(path: &Path, public_dir: &Path) -> Option<TaskKind> {
    if path.starts_with(public_dir) {
        return Some(TaskKind::Copy);
    }

    let ext = path.extension().and_then(|e| e.to_str())?;

    if IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)) {
        return Some(TaskKind::Image);
    }
    if MEDIA_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)) {
        return Some(TaskKind::Media);
    }

    match ext {
        "html" => Some(TaskKind::View),
        "js" => Some(TaskKind::Script),
        "css" => Some(TaskKind::CssMin),
        "scss" | "sass" => Some(TaskKind::Sass),
        _ => None,
    }
}
