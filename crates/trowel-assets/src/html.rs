//! HTML minification.

use minify_html::Cfg;

/// Minify an HTML document.
///
/// Comments are stripped, whitespace is collapsed, and embedded `<script>`
/// and `<style>` bodies are minified along with the markup.
pub fn minify(source: &str) -> String {
    let cfg = Cfg {
        keep_comments: false,
        minify_css: true,
        minify_js: true,
        ..Cfg::default()
    };

    let out = minify_html::minify(source.as_bytes(), &cfg);
    String::from_utf8_lossy(&out).into_owned()
}
