//! Class-based syntax highlighting.
//!
//! Produces `<span class="hl-...">` markup whose text content is already
//! HTML-escaped. Colors come from the stylesheet, not inline styles.

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use super::html::escape_html;

/// Prefix added to every highlighter class.
pub const CLASS_PREFIX: &str = "hl-";

/// Inputs above this size are escaped without highlighting. Grammar regexes
/// can take pathological time on very large files.
pub const MAX_HIGHLIGHT_BYTES: usize = 512 * 1024;

/// Highlighting failure. Callers recover by escaping the raw text.
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    #[error("input of {0} bytes exceeds highlight limit")]
    TooLarge(usize),
    #[error("highlighter error: {0}")]
    Syntax(#[from] syntect::Error),
}

/// Highlight `code` with `syntax`, returning escaped, class-annotated HTML.
pub fn highlight_html(
    code: &str,
    syntax: &SyntaxReference,
    syntax_set: &SyntaxSet,
) -> Result<String, HighlightError> {
    if code.len() > MAX_HIGHLIGHT_BYTES {
        return Err(HighlightError::TooLarge(code.len()));
    }

    let mut generator = ClassedHTMLGenerator::new_with_class_style(
        syntax,
        syntax_set,
        ClassStyle::SpacedPrefixed {
            prefix: CLASS_PREFIX,
        },
    );
    for line in LinesWithEndings::from(code) {
        generator.parse_html_for_line_which_includes_newline(line)?;
    }
    Ok(generator.finalize())
}

/// Highlight `code`, degrading to escaped plain text on any failure.
pub fn highlight_or_escape(code: &str, syntax: &SyntaxReference, syntax_set: &SyntaxSet) -> String {
    match highlight_html(code, syntax, syntax_set) {
        Ok(html) => html,
        Err(e) => {
            tracing::debug!(syntax = %syntax.name, error = %e, "Highlighting failed, escaping raw text");
            escape_html(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syntax_set() -> SyntaxSet {
        SyntaxSet::load_defaults_newlines()
    }

    #[test]
    fn test_highlight_emits_prefixed_classes() {
        let set = syntax_set();
        let syntax = set.find_syntax_by_token("rust").unwrap();
        let html = highlight_html("fn main() {}\n", syntax, &set).unwrap();
        assert!(html.contains("class=\"hl-"));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_highlight_escapes_markup() {
        let set = syntax_set();
        let syntax = set.find_syntax_by_token("html").unwrap();
        let html = highlight_html("<div>Hello</div>\n", syntax, &set).unwrap();
        assert!(!html.contains("<div>"));
        assert!(html.contains("&lt;"));
        assert!(html.contains("Hello"));
    }

    #[test]
    fn test_plain_text_keeps_text_contiguous() {
        let set = syntax_set();
        let html = highlight_html("<b>x</b> & y", set.find_syntax_plain_text(), &set).unwrap();
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt; &amp; y"));
    }

    #[test]
    fn test_oversized_input_escapes() {
        let set = syntax_set();
        let code = "<".repeat(MAX_HIGHLIGHT_BYTES + 1);
        let syntax = set.find_syntax_by_token("rust").unwrap();
        assert!(matches!(
            highlight_html(&code, syntax, &set),
            Err(HighlightError::TooLarge(_))
        ));

        let html = highlight_or_escape(&code, syntax, &set);
        assert!(!html.contains('<'));
        assert!(html.starts_with("&lt;&lt;"));
    }
}
