//! Template tag embedding for GitHub code references.
//!
//! Tags are invoked from text with Liquid-style syntax:
//!
//! ```text
//! {% github_code owner/repo/blob/main/src/lib.rs#L10-L20 %}
//! ```
//!
//! Nothing is registered implicitly. The host builds a [`TagRegistry`] during
//! startup and registers the tags it wants:
//!
//! ```
//! use ghcode::{CodeRenderer, GithubCodeTag, MockSource, TagRegistry};
//!
//! let source = MockSource::new().with_content(
//!     "https://raw.githubusercontent.com/owner/repo/main/notes.txt",
//!     "hello\n",
//! );
//! let registry = TagRegistry::new()
//!     .register(GithubCodeTag::with_source(source, CodeRenderer::new()));
//!
//! let html = registry.expand("<p>{% github_code owner/repo/blob/main/notes.txt %}</p>");
//! assert!(html.starts_with(r#"<p><div class="github-code-block">"#));
//! assert!(html.contains("hello"));
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use rayon::prelude::*;
use regex::Regex;

use crate::fetch::{ContentSource, FetchError, HttpFetcher};
use crate::reference::{GithubReference, InvalidReferenceError};
use crate::render::{CodeRenderer, error_block};

/// `{% name markup %}` invocation.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{%\s*([A-Za-z_][\w-]*)\s+(.*?)\s*%\}").unwrap());

/// Name under which [`GithubCodeTag`] is invoked.
pub const GITHUB_CODE_TAG: &str = "github_code";

/// Handler for a named template tag.
///
/// Tags are shared across rendering threads and must not fail: problems are
/// reported inline in the returned HTML.
pub trait Tag: Send + Sync {
    /// Tag name matched against `{% name ... %}`.
    fn name(&self) -> &str;

    /// Render the tag for its (variable-resolved) markup.
    fn render(&self, markup: &str) -> String;
}

/// Failure to embed a reference.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    #[error("Invalid GitHub reference: {0}")]
    InvalidReference(#[from] InvalidReferenceError),
    #[error("Failed to fetch code: {0}")]
    Fetch(#[from] FetchError),
}

/// The `github_code` tag: parse, fetch raw content, render.
pub struct GithubCodeTag<S: ContentSource = HttpFetcher> {
    source: S,
    renderer: CodeRenderer,
}

impl Default for GithubCodeTag {
    fn default() -> Self {
        Self::new()
    }
}

impl GithubCodeTag {
    /// Create a tag that fetches over HTTP with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(HttpFetcher::default(), CodeRenderer::new())
    }
}

impl<S: ContentSource> GithubCodeTag<S> {
    pub fn with_source(source: S, renderer: CodeRenderer) -> Self {
        Self { source, renderer }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Render `markup` as a code block, surfacing failures as errors.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::InvalidReference`] if `markup` is not a valid
    /// reference (no request is made), or [`EmbedError::Fetch`] if the raw
    /// content cannot be retrieved.
    pub fn try_render(&self, markup: &str) -> Result<String, EmbedError> {
        let reference = GithubReference::parse(markup)?;
        let code = self.source.fetch(&reference.raw_content_url())?;
        Ok(self.renderer.render(&reference, &code))
    }
}

impl<S: ContentSource> Tag for GithubCodeTag<S> {
    fn name(&self) -> &str {
        GITHUB_CODE_TAG
    }

    fn render(&self, markup: &str) -> String {
        match self.try_render(markup) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(markup, error = %e, "Failed to embed GitHub code");
                error_block(&e.to_string())
            }
        }
    }
}

/// Set of registered tags plus template variables.
///
/// Markup that exactly names a variable is replaced by the variable's value
/// before the tag sees it, so `{% github_code snippet %}` can point at a
/// reference defined once in configuration.
#[derive(Default)]
pub struct TagRegistry {
    tags: Vec<Box<dyn Tag>>,
    variables: BTreeMap<String, String>,
}

impl TagRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tag. A later registration with the same name replaces the
    /// earlier one.
    #[must_use]
    pub fn register(mut self, tag: impl Tag + 'static) -> Self {
        self.tags.retain(|existing| existing.name() != tag.name());
        self.tags.push(Box::new(tag));
        self
    }

    /// Define a template variable.
    #[must_use]
    pub fn variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Define several template variables.
    #[must_use]
    pub fn with_variables<I, K, V>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.variables.extend(
            variables
                .into_iter()
                .map(|(name, value)| (name.into(), value.into())),
        );
        self
    }

    /// Names of registered tags, in registration order.
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|tag| tag.name())
    }

    fn tag(&self, name: &str) -> Option<&dyn Tag> {
        self.tags
            .iter()
            .find(|tag| tag.name() == name)
            .map(|tag| &**tag)
    }

    fn resolve_markup<'a>(&'a self, markup: &'a str) -> &'a str {
        let markup = markup.trim();
        self.variables.get(markup).map_or(markup, String::as_str)
    }

    /// Render a single tag invocation, or `None` if `name` is not registered.
    pub fn render_tag(&self, name: &str, markup: &str) -> Option<String> {
        let tag = self.tag(name)?;
        Some(tag.render(self.resolve_markup(markup)))
    }

    /// Replace every registered tag invocation in `text` with its rendering.
    ///
    /// Invocations are rendered in parallel and spliced back in document
    /// order. Invocations of unknown tags are left untouched.
    pub fn expand(&self, text: &str) -> String {
        let invocations: Vec<_> = TAG_RE
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.get(1)?.as_str();
                let markup = caps.get(2).map_or("", |m| m.as_str());
                self.tag(name).map(|_| (whole.range(), name, markup))
            })
            .collect();

        if invocations.is_empty() {
            return text.to_owned();
        }
        tracing::debug!(count = invocations.len(), "Expanding tags");

        let rendered: Vec<String> = invocations
            .par_iter()
            .map(|(_, name, markup)| self.render_tag(name, markup).unwrap_or_default())
            .collect();

        let extra: usize = rendered.iter().map(String::len).sum();
        let mut out = String::with_capacity(text.len() + extra);
        let mut cursor = 0;
        for ((range, _, _), html) in invocations.iter().zip(&rendered) {
            out.push_str(&text[cursor..range.start]);
            out.push_str(html);
            cursor = range.end;
        }
        out.push_str(&text[cursor..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockSource;
    use crate::render::{BLOCK_CLASS, ERROR_CLASS};
    use pretty_assertions::assert_eq;

    const ROWS_URL: &str = "https://raw.githubusercontent.com/owner/repo/main/rows.txt";

    fn rows() -> String {
        (b'A'..=b'T').map(|c| format!("Row_{}\n", c as char)).collect()
    }

    fn tag(source: MockSource) -> GithubCodeTag<MockSource> {
        GithubCodeTag::with_source(source, CodeRenderer::new())
    }

    struct Upper;

    impl Tag for Upper {
        fn name(&self) -> &str {
            "upper"
        }

        fn render(&self, markup: &str) -> String {
            markup.to_uppercase()
        }
    }

    #[test]
    fn test_render_line_range() {
        let tag = tag(MockSource::new().with_content(ROWS_URL, rows()));
        let html = tag.render("owner/repo/blob/main/rows.txt#L5-L10");

        assert!(html.contains(BLOCK_CLASS));
        for row in ["Row_E", "Row_F", "Row_G", "Row_H", "Row_I", "Row_J"] {
            assert!(html.contains(row), "missing {row}");
        }
        assert!(!html.contains("Row_A"));
        assert!(!html.contains("Row_D"));
        assert!(!html.contains("Row_K"));
        assert!(!html.contains("Row_T"));
        assert!(html.contains("rows.txt (L5-L10)"));
    }

    #[test]
    fn test_invalid_reference_renders_error() {
        let tag = tag(MockSource::new());
        let html = tag.render("invalid-reference");

        assert!(html.contains(ERROR_CLASS));
        assert!(html.contains("Invalid GitHub reference"));
        assert!(!html.contains(BLOCK_CLASS));
    }

    #[test]
    fn test_fetch_failure_renders_error() {
        let tag = tag(MockSource::new());
        let html = tag.render("owner/repo/blob/main/missing.rs");

        assert!(html.contains(ERROR_CLASS));
        assert!(html.contains("Failed to fetch code"));
        assert!(html.contains("404"));
        assert!(!html.contains(BLOCK_CLASS));
    }

    #[test]
    fn test_try_render_error_kinds() {
        let tag = tag(MockSource::new().with_status(ROWS_URL, 500));

        assert!(matches!(
            tag.try_render(""),
            Err(EmbedError::InvalidReference(_))
        ));
        let err = tag.try_render("owner/repo/blob/main/rows.txt").unwrap_err();
        match err {
            EmbedError::Fetch(e) => assert_eq!(e.status(), Some(500)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_error_message_is_escaped() {
        let tag = tag(MockSource::new());
        let html = tag.render("<script>alert(1)</script>");
        assert!(html.contains(ERROR_CLASS));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_expand_splices_in_order() {
        let registry = TagRegistry::new().register(Upper);
        assert_eq!(
            registry.expand("a {% upper one %} b {%upper two%} c"),
            "a ONE b TWO c"
        );
    }

    #[test]
    fn test_expand_leaves_unknown_tags() {
        let registry = TagRegistry::new().register(Upper);
        assert_eq!(
            registry.expand("{% include foo.html %} {% upper x %}"),
            "{% include foo.html %} X"
        );
    }

    #[test]
    fn test_expand_without_tags() {
        let registry = TagRegistry::new();
        assert_eq!(registry.expand("plain {% upper x %}"), "plain {% upper x %}");
    }

    #[test]
    fn test_variables_resolve_markup() {
        let registry = TagRegistry::new()
            .register(tag(MockSource::new().with_content(ROWS_URL, rows())))
            .variable("snippet", "owner/repo/blob/main/rows.txt#L2");

        let html = registry.expand("{% github_code snippet %}");
        assert!(html.contains("Row_B"));
        assert!(!html.contains("Row_C"));
    }

    #[test]
    fn test_unresolved_variable_is_literal() {
        let registry = TagRegistry::new()
            .register(Upper)
            .with_variables([("name", "value")]);
        assert_eq!(registry.render_tag("upper", " other "), Some("OTHER".to_owned()));
        assert_eq!(registry.render_tag("upper", "name"), Some("VALUE".to_owned()));
        assert_eq!(registry.render_tag("missing", "name"), None);
    }

    #[test]
    fn test_register_replaces_same_name() {
        struct Lower;
        impl Tag for Lower {
            fn name(&self) -> &str {
                "upper"
            }
            fn render(&self, markup: &str) -> String {
                markup.to_lowercase()
            }
        }

        let registry = TagRegistry::new().register(Upper).register(Lower);
        assert_eq!(registry.tag_names().collect::<Vec<_>>(), vec!["upper"]);
        assert_eq!(registry.expand("{% upper AbC %}"), "abc");
    }

    #[test]
    fn test_expand_many_tags() {
        let mut source = MockSource::new();
        let mut text = String::new();
        for i in 0..16 {
            source = source.with_content(
                format!("https://raw.githubusercontent.com/owner/repo/main/f{i}.txt"),
                format!("content {i}\n"),
            );
            text.push_str(&format!("[{{% github_code owner/repo/blob/main/f{i}.txt %}}]"));
        }
        let registry = TagRegistry::new().register(tag(source));
        let html = registry.expand(&text);

        let positions: Vec<usize> = (0..16)
            .map(|i| html.find(&format!("/f{i}.txt\"")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(html.matches(BLOCK_CLASS).count(), 16);
    }
}
