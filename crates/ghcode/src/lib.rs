//! Embed highlighted excerpts of GitHub-hosted files into HTML documents.
//!
//! The pipeline has three stages, each usable on its own:
//!
//! - [`GithubReference`] parses `owner/repo/blob/branch/path[#Lstart[-Lend]]`
//!   shorthands and full `https://github.com/...` URLs.
//! - [`ContentSource`] retrieves the file's raw content. [`HttpFetcher`] follows
//!   a bounded number of redirects; [`MockSource`] serves canned responses.
//! - [`CodeRenderer`] extracts the line range, resolves a language, highlights,
//!   and assembles an HTML block. Rendering never fails.
//!
//! [`GithubCodeTag`] chains the stages and turns parse and fetch failures into
//! an inline error fragment. [`TagRegistry`] expands `{% github_code ... %}`
//! invocations in text.
//!
//! # Example
//!
//! ```
//! use ghcode::{CodeRenderer, GithubCodeTag, MockSource, Tag};
//!
//! let source = MockSource::new().with_content(
//!     "https://raw.githubusercontent.com/owner/repo/main/src/lib.rs",
//!     "pub fn one() -> u32 {\n    1\n}\n",
//! );
//! let tag = GithubCodeTag::with_source(source, CodeRenderer::new());
//!
//! let html = tag.render("owner/repo/blob/main/src/lib.rs#L1-L3");
//! assert!(html.contains(r#"class="language-rust""#));
//!
//! let html = tag.render("not a reference");
//! assert!(html.contains("github-code-error"));
//! ```
//!
//! No state is shared between renders beyond the read-only grammar set, so
//! tags may be rendered from many threads at once.

pub mod assets;
pub mod embed;
pub mod fetch;
pub mod reference;
pub mod render;

pub use embed::{EmbedError, GITHUB_CODE_TAG, GithubCodeTag, Tag, TagRegistry};
pub use fetch::{ContentSource, FetchError, FetchErrorKind, HttpFetcher, MockSource};
pub use reference::{GithubReference, InvalidReason, InvalidReferenceError, LineRange};
pub use render::CodeRenderer;
