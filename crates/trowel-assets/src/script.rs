//! JavaScript compilation.
//!
//! Parses with oxc, downlevels to the configured ECMAScript target, and
//! either minifies (production) or emits a source map (development).

use std::path::Path;

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::semantic::SemanticBuilder;
use oxc::span::SourceType;
use oxc::transformer::{TransformOptions, Transformer};

use crate::Compiled;

/// Options for a script compile.
#[derive(Debug, Clone, Copy)]
pub struct ScriptOptions<'a> {
    /// ECMAScript target to downlevel to, e.g. `"es2015"`.
    pub target: &'a str,

    /// Minify and mangle the output.
    pub minify: bool,

    /// Emit a source map alongside the output.
    pub source_map: bool,
}

/// Errors from the script pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Unknown ECMAScript target: {0}")]
    Target(String),

    #[error("Failed to transform {path}: {message}")]
    Transform { path: String, message: String },
}

/// Compile a JavaScript source file.
///
/// `path` is used for diagnostics and as the source name in emitted maps.
pub fn compile(source: &str, path: &Path, opts: &ScriptOptions) -> Result<Compiled, ScriptError> {
    let allocator = Allocator::default();
    let source_type = SourceType::mjs();

    let ret = Parser::new(&allocator, source, source_type).parse();
    if !ret.errors.is_empty() {
        return Err(ScriptError::Parse {
            path: path.display().to_string(),
            message: join_diagnostics(&ret.errors),
        });
    }
    let mut program = ret.program;

    let scoping = SemanticBuilder::new().build(&program).semantic.into_scoping();

    let options =
        TransformOptions::from_target(opts.target).map_err(|e| ScriptError::Target(e.to_string()))?;
    let transformed = Transformer::new(&allocator, path, &options)
        .build_with_scoping(scoping, &mut program);
    if !transformed.errors.is_empty() {
        return Err(ScriptError::Transform {
            path: path.display().to_string(),
            message: join_diagnostics(&transformed.errors),
        });
    }

    if opts.minify {
        let options = MinifierOptions {
            mangle: Some(MangleOptions::default()),
            compress: Some(CompressOptions::smallest()),
        };
        let minified = Minifier::new(options).minify(&allocator, &mut program);
        let code = Codegen::new()
            .with_options(CodegenOptions {
                minify: true,
                comments: CommentOptions::disabled(),
                ..CodegenOptions::default()
            })
            .with_scoping(minified.scoping)
            .build(&program)
            .code;
        return Ok(Compiled { code, map: None });
    }

    let codegen_options = CodegenOptions {
        source_map_path: opts.source_map.then(|| path.to_path_buf()),
        ..CodegenOptions::default()
    };
    let out = Codegen::new().with_options(codegen_options).build(&program);

    Ok(Compiled {
        code: out.code,
        map: out.map.map(|m| m.to_json_string()),
    })
}

fn join_diagnostics(errors: &[oxc::diagnostics::OxcDiagnostic]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
