//! Stylesheet compilation.
//!
//! Sass goes through grass first; both Sass output and plain CSS then pass
//! through lightningcss, which lowers modern syntax and adds vendor prefixes
//! for the built-in browser targets.

use std::path::PathBuf;

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use parcel_sourcemap::SourceMap;

use crate::Compiled;

/// Options for a stylesheet compile.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleOptions<'a> {
    /// Minify the output.
    pub minify: bool,

    /// Emit a source map alongside the output.
    pub source_map: bool,

    /// Roots for resolving Sass `@use`/`@import` and partials.
    pub load_paths: &'a [PathBuf],
}

/// Errors from the stylesheet pipeline.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    #[error("Failed to parse {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Failed to compile Sass {file}: {message}")]
    Sass { file: String, message: String },

    #[error("Failed to print {file}: {message}")]
    Print { file: String, message: String },
}

/// Browser versions are encoded as `major << 16 | minor << 8`.
const fn v(major: u32, minor: u32) -> Option<u32> {
    Some(major << 16 | minor << 8)
}

/// Built-in prefixing targets: evergreen desktop/mobile plus Safari 14.
fn browser_targets() -> Targets {
    Targets::from(Browsers {
        android: v(90, 0),
        chrome: v(90, 0),
        edge: v(90, 0),
        firefox: v(88, 0),
        ios_saf: v(14, 0),
        opera: v(76, 0),
        safari: v(14, 0),
        samsung: v(14, 0),
        ..Browsers::default()
    })
}

/// Compile a CSS source: lower syntax, add vendor prefixes, and optionally
/// minify and emit a source map.
///
/// `filename` names the source in diagnostics and emitted maps.
pub fn compile_css(
    source: &str,
    filename: &str,
    opts: &StyleOptions,
) -> Result<Compiled, StyleError> {
    let targets = browser_targets();

    let mut stylesheet = StyleSheet::parse(
        source,
        ParserOptions {
            filename: filename.to_string(),
            ..ParserOptions::default()
        },
    )
    .map_err(|e| StyleError::Parse {
        file: filename.to_string(),
        message: e.to_string(),
    })?;

    stylesheet
        .minify(MinifyOptions {
            targets,
            ..MinifyOptions::default()
        })
        .map_err(|e| StyleError::Parse {
            file: filename.to_string(),
            message: e.to_string(),
        })?;

    let mut source_map = if opts.source_map {
        let mut map = SourceMap::new("/");
        let idx = map.add_source(filename);
        let _ = map.set_source_content(idx as usize, source);
        Some(map)
    } else {
        None
    };

    let out = stylesheet
        .to_css(PrinterOptions {
            minify: opts.minify,
            source_map: source_map.as_mut(),
            targets,
            ..PrinterOptions::default()
        })
        .map_err(|e| StyleError::Print {
            file: filename.to_string(),
            message: e.to_string(),
        })?;

    let map = source_map.and_then(|mut m| m.to_json(None).ok());

    Ok(Compiled {
        code: out.code,
        map,
    })
}

/// Compile a Sass source, then run the result through the CSS pipeline.
///
/// grass produces no source maps, so a development map covers the
/// grass-emitted CSS rather than the original Sass.
pub fn compile_sass(
    source: &str,
    filename: &str,
    opts: &StyleOptions,
) -> Result<Compiled, StyleError> {
    let mut grass_opts = grass::Options::default();
    for load_path in opts.load_paths {
        grass_opts = grass_opts.load_path(load_path);
    }

    let css = grass::from_string(source.to_owned(), &grass_opts).map_err(|e| StyleError::Sass {
        file: filename.to_string(),
        message: e.to_string(),
    })?;

    compile_css(&css, filename, opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn adds_vendor_prefixes() {
        let css = ".toolbar { user-select: none; }";

        let out = compile_css(css, "toolbar.css", &StyleOptions::default()).unwrap();

        assert!(out.code.contains("-webkit-user-select"));
        assert!(out.code.contains("user-select: none"));
    }

    #[test]
    fn minifies_when_asked() {
        let css = ".button {\n  background-color: blue;\n  padding: 10px;\n}\n";

        let out = compile_css(
            css,
            "button.css",
            &StyleOptions {
                minify: true,
                ..StyleOptions::default()
            },
        )
        .unwrap();

        assert!(!out.code.contains('\n'));
        assert!(out.code.contains(".button"));
        assert!(out.map.is_none());
    }

    #[test]
    fn emits_source_map_in_development() {
        let css = "a { color: red; }";

        let out = compile_css(
            css,
            "links.css",
            &StyleOptions {
                source_map: true,
                ..StyleOptions::default()
            },
        )
        .unwrap();

        let map = out.map.expect("development build should carry a map");
        assert!(map.contains("\"mappings\""));
        assert!(map.contains("links.css"));
    }

    #[test]
    fn rejects_invalid_css() {
        let err = compile_css("a { color red; }", "bad.css", &StyleOptions::default()).unwrap_err();

        assert!(matches!(err, StyleError::Parse { .. }));
    }

    #[test]
    fn compiles_nested_sass() {
        let out = compile_sass(
            "nav {\n  ul { margin: 0; }\n}\n",
            "nav.scss",
            &StyleOptions::default(),
        )
        .unwrap();

        assert!(out.code.contains("nav ul"));
    }

    #[test]
    fn resolves_sass_partials_from_load_paths() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("_colors.scss"), "$accent: #336699;\n").unwrap();
        let load_paths = vec![temp.path().to_path_buf()];

        let out = compile_sass(
            "@use \"colors\";\na { color: colors.$accent; }\n",
            "theme.scss",
            &StyleOptions {
                load_paths: &load_paths,
                ..StyleOptions::default()
            },
        )
        .unwrap();

        assert_eq!(out.code.trim(), "a {\n  color: #369;\n}");
    }

    #[test]
    fn reports_sass_errors_with_file() {
        let err = compile_sass(
            "a { color: $missing; }",
            "broken.scss",
            &StyleOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, StyleError::Sass { .. }));
        assert!(err.to_string().contains("broken.scss"));
    }
}
