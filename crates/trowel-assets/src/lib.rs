//! Per-format asset transforms for the trowel pipeline.
//!
//! Thin, options-driven wrappers over the transformation crates: `minify-html`
//! for HTML, `oxc` for JavaScript, `grass` and `lightningcss` for stylesheets.

pub mod html;
pub mod script;
pub mod style;

pub use script::{ScriptError, ScriptOptions};
pub use style::{StyleError, StyleOptions};

/// Output of a compiling transform.
#[derive(Debug, Clone)]
pub struct Compiled {
    /// Compiled source code.
    pub code: String,

    /// Source map JSON, when the transform was asked for one.
    pub map: Option<String>,
}
