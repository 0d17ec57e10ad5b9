//! Clean task: erase the output directory.

use std::fs;

use crate::config::BuildContext;
use crate::task::TaskError;

pub fn run(ctx: &BuildContext) -> Result<usize, TaskError> {
    let out = ctx.out_dir();

    if !out.exists() {
        return Ok(0);
    }

    fs::remove_dir_all(out).map_err(|e| TaskError::Write {
        path: out.to_path_buf(),
        source: e,
    })?;

    Ok(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Profile};
    use tempfile::tempdir;

    fn ctx(out: &std::path::Path) -> BuildContext {
        let mut config = Config::default();
        config.paths.out = out.to_path_buf();
        BuildContext::new(config, Profile::Development)
    }

    #[test]
    fn removes_output_directory() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        fs::create_dir_all(out.join("nested")).unwrap();
        fs::write(out.join("nested/page.html"), "<p>old</p>").unwrap();

        run(&ctx(&out)).unwrap();

        assert!(!out.exists());
    }

    #[test]
    fn missing_output_is_a_no_op() {
        let temp = tempdir().unwrap();

        let removed = run(&ctx(&temp.path().join("dist"))).unwrap();

        assert_eq!(removed, 0);
    }
}
