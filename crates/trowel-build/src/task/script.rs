//! Script task: compile JavaScript.
//!
//! Production builds are minified with no maps; development builds keep the
//! code readable and write a `.js.map` next to each output.

use rayon::prelude::*;
use trowel_assets::script::{self, ScriptOptions};

use crate::config::BuildContext;
use crate::task::{files_under, has_extension, read_file, write_file, TaskError};

pub fn run(ctx: &BuildContext) -> Result<usize, TaskError> {
    let src = ctx.src_dir();
    let out = ctx.out_dir();
    let files = files_under(src, |p| has_extension(p, &["js"]));

    let opts = ScriptOptions {
        target: &ctx.config.build.js_target,
        minify: ctx.profile.minify(),
        source_map: ctx.profile.source_maps(),
    };

    let results: Vec<Result<(), TaskError>> = files
        .par_iter()
        .map(|path| {
            let rel = path.strip_prefix(src).unwrap_or(path);
            let source = read_file(path)?;

            let compiled = script::compile(&source, rel, &opts)?;

            let out_path = out.join(rel);
            let mut code = compiled.code;

            if let Some(map) = compiled.map {
                let map_path = out_path.with_extension("js.map");
                if let Some(map_name) = map_path.file_name().and_then(|n| n.to_str()) {
                    code.push_str(&format!("//# sourceMappingURL={map_name}\n"));
                }
                write_file(&map_path, map)?;
            }

            write_file(&out_path, code)
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
    use std::fs;
    use tempfile::tempdir;

    fn ctx(root: &std::path::Path, profile: Profile) -> BuildContext {
        let mut config = Config::default();
        config.paths.src = root.join("src");
        config.paths.out = root.join("dist");
        BuildContext::new(config, profile)
    }

    #[test]
    fn development_writes_map_and_reference() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("js")).unwrap();
        fs::write(src.join("js/app.js"), "export const answer = 6 * 7;\n").unwrap();

        let compiled = run(&ctx(temp.path(), Profile::Development)).unwrap();

        assert_eq!(compiled, 1);
        let code = fs::read_to_string(temp.path().join("dist/js/app.js")).unwrap();
        assert!(code.contains("sourceMappingURL=app.js.map"));
        let map = fs::read_to_string(temp.path().join("dist/js/app.js.map")).unwrap();
        assert!(map.contains("\"mappings\""));
    }

    #[test]
    fn production_minifies_without_maps() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(
            src.join("app.js"),
            "export function double(value) {\n  return value * 2;\n}\n",
        )
        .unwrap();

        run(&ctx(temp.path(), Profile::Production)).unwrap();

        let code = fs::read_to_string(temp.path().join("dist/app.js")).unwrap();
        assert!(!code.contains("sourceMappingURL"));
        assert!(!code.contains("value"));
        assert!(!temp.path().join("dist/app.js.map").exists());
    }

    #[test]
    fn parse_errors_fail_the_task() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("bad.js"), "function {").unwrap();

        let err = run(&ctx(temp.path(), Profile::Development)).unwrap_err();

        assert!(err.to_string().contains("bad.js"));
    }
}
