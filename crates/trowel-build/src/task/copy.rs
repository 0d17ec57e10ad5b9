//! Copy task: static assets, verbatim.
//!
//! Everything under the static directory (vendored libraries, favicons,
//! anything pre-built) lands in the output tree unchanged.

use std::fs;

use rayon::prelude::*;

use crate::config::BuildContext;
use crate::task::{files_under, TaskError};

pub fn run(ctx: &BuildContext) -> Result<usize, TaskError> {
    let public = ctx.public_dir();

    if !public.exists() {
        tracing::debug!("no static directory at {}", public.display());
        return Ok(0);
    }

    let files = files_under(public, |_| true);
    let out = ctx.out_dir();

    let results: Vec<Result<(), TaskError>> = files
        .par_iter()
        .map(|path| {
            let rel = path.strip_prefix(public).unwrap_or(path);
            let dest = out.join(rel);

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(|e| TaskError::Write {
                    path: dest.clone(),
                    source: e,
                })?;
            }

            fs::copy(path, &dest)
                .map(|_| ())
                .map_err(|e| TaskError::Write {
                    path: dest.clone(),
                    source: e,
                })
        })
        .collect();

    for result in results {
        result?;
    }

    Ok(files.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Profile};
    use tempfile::tempdir;

    fn ctx(root: &std::path::Path) -> BuildContext {
        let mut config = Config::default();
        config.paths.public = root.join("public");
        config.paths.out = root.join("dist");
        BuildContext::new(config, Profile::Development)
    }

    #[test]
    fn copies_tree_verbatim() {
        let temp = tempdir().unwrap();
        let public = temp.path().join("public");
        fs::create_dir_all(public.join("vendor")).unwrap();
        fs::write(public.join("vendor/jquery.js"), "window.$ = {};").unwrap();
        fs::write(public.join("favicon.ico"), [0u8, 1, 2, 3]).unwrap();

        let copied = run(&ctx(temp.path())).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(
            fs::read_to_string(temp.path().join("dist/vendor/jquery.js")).unwrap(),
            "window.$ = {};"
        );
        assert_eq!(
            fs::read(temp.path().join("dist/favicon.ico")).unwrap(),
            vec![0u8, 1, 2, 3]
        );
    }

    #[test]
    fn missing_static_directory_is_a_no_op() {
        let temp = tempdir().unwrap();

        let copied = run(&ctx(temp.path())).unwrap();

        assert_eq!(copied, 0);
    }
}
