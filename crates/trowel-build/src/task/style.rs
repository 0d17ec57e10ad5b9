//! Stylesheet tasks: plain CSS (cssmin) and Sass.
//!
//! Both end in the same CSS pipeline: vendor prefixes from the built-in
//! browser targets, minification in production, a `.css.map` next to each
//! output in development.

use std::path::PathBuf;

use rayon::prelude::*;
use trowel_assets::style::{self, StyleOptions};

use crate::config::BuildContext;
use crate::task::{
    files_under, has_extension, is_partial, read_file, relative_name, write_file, TaskError,
};

pub fn run_css(ctx: &BuildContext) -> Result<usize, TaskError> {
    let src = ctx.src_dir();
    let files = files_under(src, |p| has_extension(p, &["css"]));

    let results: Vec<Result<(), TaskError>> = files
        .par_iter()
        .map(|path| {
            let rel = path.strip_prefix(src).unwrap_or(path);
            let source = read_file(path)?;

            let opts = StyleOptions {
                minify: ctx.profile.minify(),
                source_map: ctx.profile.source_maps(),
                load_paths: &[],
            };
            let compiled = style::compile_css(&source, &relative_name(rel), &opts)?;

            write_output(ctx, rel.to_path_buf(), compiled)
        })
        .collect();

    for result in results {
        result?;
    }

    Ok(files.len())
}

pub fn run_sass(ctx: &BuildContext) -> Result<usize, TaskError> {
    let src = ctx.src_dir();
    let files = files_under(src, |p| {
        has_extension(p, &["scss", "sass"]) && !is_partial(p)
    });

    let results: Vec<Result<(), TaskError>> = files
        .par_iter()
        .map(|path| {
            let rel = path.strip_prefix(src).unwrap_or(path);
            let source = read_file(path)?;

            // Partials resolve against the file's own directory first, then
            // the source root.
            let mut load_paths: Vec<PathBuf> = Vec::new();
            if let Some(parent) = path.parent() {
                load_paths.push(parent.to_path_buf());
            }
            load_paths.push(src.to_path_buf());

            let opts = StyleOptions {
                minify: ctx.profile.minify(),
                source_map: ctx.profile.source_maps(),
                load_paths: &load_paths,
            };
            let compiled = style::compile_sass(&source, &relative_name(rel), &opts)?;

            write_output(ctx, rel.with_extension("css"), compiled)
        })
        .collect();

    for result in results {
        result?;
    }

    Ok(files.len())
}

/// Write compiled CSS (and its map, when present) under the output tree.
fn write_output(
    ctx: &BuildContext,
    rel: PathBuf,
    compiled: trowel_assets::Compiled,
) -> Result<(), TaskError> {
    let out_path = ctx.out_dir().join(&rel);
    let mut code = compiled.code;

    if let Some(map) = compiled.map {
        let map_path = out_path.with_extension("css.map");
        if let Some(map_name) = map_path.file_name().and_then(|n| n.to_str()) {
            code.push_str(&format!("\n/*# sourceMappingURL={map_name} */\n"));
        }
        write_file(&map_path, map)?;
    }

    write_file(&out_path, code)
}
