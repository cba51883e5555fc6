//! Rendering of fetched files into self-contained HTML code blocks.
//!
//! [`CodeRenderer::render`] never fails: every failure inside the pipeline
//! degrades to escaped plain text, and source text is escaped on every path.

mod highlight;
mod html;
mod language;
mod lines;

pub use highlight::{CLASS_PREFIX, HighlightError, MAX_HIGHLIGHT_BYTES, highlight_html};
pub use html::{BLOCK_CLASS, ERROR_CLASS, error_block, escape_html};
pub use language::{EXTENSION_OVERRIDES, LanguageResolver, ResolvedLanguage, Strategy};
pub use lines::extract_lines;

use crate::reference::GithubReference;

/// Renders a reference and its file content into an HTML code block.
///
/// # Example
///
/// ```
/// use ghcode::{CodeRenderer, GithubReference};
///
/// let renderer = CodeRenderer::new();
/// let reference = GithubReference::parse("owner/repo/blob/main/hello.py#L2").unwrap();
/// let html = renderer.render(&reference, "import sys\nprint('hi')\n");
///
/// assert!(html.contains("language-python"));
/// assert!(html.contains("hello.py (L2)"));
/// assert!(!html.contains("import"));
/// ```
pub struct CodeRenderer {
    resolver: LanguageResolver,
    highlight: bool,
}

impl Default for CodeRenderer {
    fn default() -> Self {
        Self::with_resolver(LanguageResolver::default())
    }
}

impl CodeRenderer {
    /// Create a renderer with the bundled grammars and highlighting enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_resolver(resolver: LanguageResolver) -> Self {
        Self {
            resolver,
            highlight: true,
        }
    }

    /// Disable server-side highlighting.
    ///
    /// Code is only escaped; the `language-*` class is still emitted so a
    /// client-side highlighter can take over.
    #[must_use]
    pub fn without_highlighting(mut self) -> Self {
        self.highlight = false;
        self
    }

    /// Enable or disable server-side highlighting.
    #[must_use]
    pub fn highlight(mut self, enabled: bool) -> Self {
        self.highlight = enabled;
        self
    }

    pub fn resolver(&self) -> &LanguageResolver {
        &self.resolver
    }

    /// Render `code` (the full file content) for `reference`.
    pub fn render(&self, reference: &GithubReference, code: &str) -> String {
        let excerpt = match reference.lines() {
            Some(range) => extract_lines(code, range),
            None => code,
        };

        let language = self.resolver.resolve(reference, excerpt);
        tracing::debug!(
            file = reference.filename(),
            language = %language.name,
            strategy = ?language.strategy,
            "Resolved language"
        );

        let code_html = if self.highlight {
            highlight::highlight_or_escape(excerpt, language.syntax, self.resolver.syntax_set())
        } else {
            escape_html(excerpt)
        };

        html::code_block(reference, &language.name, &code_html)
    }
}
