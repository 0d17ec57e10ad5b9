//! View task: render HTML templates.
//!
//! Templates resolve includes and inheritance against the source root, so
//! `{% include "_header.html" %}` works from any page. Partials themselves
//! are never emitted.

use minijinja::{context, path_loader, Environment};
use rayon::prelude::*;

use crate::config::BuildContext;
use crate::task::{files_under, has_extension, is_partial, relative_name, write_file, TaskError};

pub fn run(ctx: &BuildContext) -> Result<usize, TaskError> {
    let src = ctx.src_dir();
    let out = ctx.out_dir();
    let files = files_under(src, |p| has_extension(p, &["html"]) && !is_partial(p));

    if files.is_empty() {
        return Ok(0);
    }

    let mut env = Environment::new();
    env.set_loader(path_loader(src));

    let minify = ctx.profile.minify();

    let results: Vec<Result<(), TaskError>> = files
        .par_iter()
        .map(|path| {
            let rel = path.strip_prefix(src).unwrap_or(path);
            let name = relative_name(rel);

            let template = env.get_template(&name).map_err(|e| TaskError::Render {
                path: path.clone(),
                message: e.to_string(),
            })?;

            let html = template.render(context! {}).map_err(|e| TaskError::Render {
                path: path.clone(),
                message: e.to_string(),
            })?;

            let html = if minify {
                trowel_assets::html::minify(&html)
            } else {
                html
            };

            write_file(&out.join(rel), html)
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
    fn renders_includes_and_skips_partials() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("pages")).unwrap();
        fs::write(src.join("_header.html"), "<header>Site</header>").unwrap();
        fs::write(
            src.join("pages/about.html"),
            "{% include \"_header.html\" %}\n<main>About</main>\n",
        )
        .unwrap();

        let rendered = run(&ctx(temp.path(), Profile::Development)).unwrap();

        assert_eq!(rendered, 1);
        let html = fs::read_to_string(temp.path().join("dist/pages/about.html")).unwrap();
        assert!(html.contains("<header>Site</header>"));
        assert!(html.contains("<main>About</main>"));
        assert!(!temp.path().join("dist/_header.html").exists());
    }

    #[test]
    fn production_minifies_output() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(
            src.join("index.html"),
            "<html>\n  <body>\n    <!-- note -->\n    <p>hello</p>\n  </body>\n</html>\n",
        )
        .unwrap();

        run(&ctx(temp.path(), Profile::Production)).unwrap();

        let html = fs::read_to_string(temp.path().join("dist/index.html")).unwrap();
        assert!(!html.contains("note"));
        assert!(!html.contains("\n  "));
    }

    #[test]
    fn template_errors_name_the_source_file() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("broken.html"), "{% include \"_missing.html\" %}").unwrap();

        let err = run(&ctx(temp.path(), Profile::Development)).unwrap_err();

        assert!(matches!(err, TaskError::Render { .. }));
        assert!(err.to_string().contains("broken.html"));
    }
}
