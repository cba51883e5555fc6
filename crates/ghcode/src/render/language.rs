//! Language resolution for fetched files.
//!
//! Resolution is an ordered fallback chain; the first strategy that succeeds
//! wins:
//!
//! 1. **Filename**: convention names the extension would miss (`Dockerfile`,
//!    `fedora.Containerfile`, `Gemfile`), then the highlighter's own filename
//!    associations.
//! 2. **Extension**: the extension, mapped through [`EXTENSION_OVERRIDES`]
//!    where the conventional extension differs from the language name, and
//!    otherwise passed through as the language name. An override renames the
//!    language but keeps the grammar registered for the extension.
//! 3. **Filename prefix**: variants such as `Dockerfile.dev`, only when the
//!    extension resolved to nothing (`dockerfile.md` stays Markdown).
//! 4. **Content**: first-line sniffing (shebangs, `<?xml`, modelines).
//! 5. **Plain text**: never fails.

use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::reference::GithubReference;

/// Extensions whose language name differs from the extension itself.
pub const EXTENSION_OVERRIDES: &[(&str, &str)] = &[
    ("rb", "ruby"),
    ("py", "python"),
    ("js", "javascript"),
    ("mjs", "javascript"),
    ("cjs", "javascript"),
    ("ts", "typescript"),
    ("yml", "yaml"),
    ("md", "markdown"),
    ("sh", "bash"),
    ("zsh", "bash"),
    ("dockerfile", "dockerfile"),
    ("containerfile", "dockerfile"),
    ("rs", "rust"),
    ("txt", "text"),
    ("htm", "html"),
    ("h", "c"),
    ("hpp", "cpp"),
    ("cc", "cpp"),
    ("cxx", "cpp"),
    ("cs", "csharp"),
    ("kt", "kotlin"),
    ("pl", "perl"),
    ("hs", "haskell"),
    ("ex", "elixir"),
    ("exs", "elixir"),
    ("mk", "makefile"),
    ("tf", "hcl"),
];

/// Convention filenames (compared case-insensitively).
const FILENAMES: &[(&str, &str)] = &[
    ("dockerfile", "dockerfile"),
    ("containerfile", "dockerfile"),
    ("makefile", "makefile"),
    ("gnumakefile", "makefile"),
    ("gemfile", "ruby"),
    ("rakefile", "ruby"),
    ("podfile", "ruby"),
    ("vagrantfile", "ruby"),
    ("brewfile", "ruby"),
    ("cmakelists.txt", "cmake"),
    ("jenkinsfile", "groovy"),
    ("justfile", "just"),
    ("pkgbuild", "bash"),
    (".bashrc", "bash"),
    (".bash_profile", "bash"),
    (".zshrc", "bash"),
    (".profile", "bash"),
];

/// Filename stems that mark a container build file when used as a suffix
/// (`fedora.Containerfile`) or, after extension lookup, a prefix
/// (`Dockerfile.dev`).
const CONTAINER_STEMS: &[&str] = &["dockerfile", "containerfile"];

/// Which step of the fallback chain produced the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Filename,
    Extension,
    Content,
    PlainText,
}

/// Resolves a highlighter grammar and language name for a reference.
///
/// Owns the grammar set, which is expensive to load: create one resolver per
/// process and share it. Resolution itself holds no mutable state.
pub struct LanguageResolver {
    syntax_set: SyntaxSet,
}

impl Default for LanguageResolver {
    fn default() -> Self {
        Self::with_syntax_set(SyntaxSet::load_defaults_newlines())
    }
}

impl LanguageResolver {
    /// Create a resolver with the bundled grammar set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver over a custom grammar set.
    #[must_use]
    pub fn with_syntax_set(syntax_set: SyntaxSet) -> Self {
        Self { syntax_set }
    }

    pub fn syntax_set(&self) -> &SyntaxSet {
        &self.syntax_set
    }

    /// Resolve the language of `reference`, sniffing `code` if the name is
    /// not conclusive.
    pub fn resolve(&self, reference: &GithubReference, code: &str) -> ResolvedLanguage<'_> {
        self.by_filename(reference.filename())
            .or_else(|| self.by_extension(reference.extension()))
            .or_else(|| self.by_filename_prefix(reference.filename()))
            .or_else(|| self.by_content(code))
            .unwrap_or_else(|| self.plain_text(reference.extension()))
    }

    fn by_filename(&self, filename: &str) -> Option<ResolvedLanguage<'_>> {
        let lower = filename.to_ascii_lowercase();
        if let Some(name) = lookup(FILENAMES, &lower).or_else(|| container_suffix(&lower)) {
            return Some(self.named(name, filename, Strategy::Filename));
        }

        let syntax = self.syntax_set.find_syntax_by_extension(filename)?;
        Some(ResolvedLanguage::from_syntax(syntax, Strategy::Filename))
    }

    fn by_extension(&self, extension: &str) -> Option<ResolvedLanguage<'_>> {
        if extension.is_empty() {
            return None;
        }
        let lower = extension.to_ascii_lowercase();
        if let Some(name) = lookup(EXTENSION_OVERRIDES, &lower) {
            return Some(self.named(name, extension, Strategy::Extension));
        }

        let syntax = self
            .syntax_set
            .find_syntax_by_token(&lower)
            .or_else(|| self.syntax_set.find_syntax_by_extension(extension))?;
        Some(ResolvedLanguage {
            name: lower,
            syntax,
            strategy: Strategy::Extension,
        })
    }

    fn by_filename_prefix(&self, filename: &str) -> Option<ResolvedLanguage<'_>> {
        let name = container_prefix(&filename.to_ascii_lowercase())?;
        Some(self.named(name, filename, Strategy::Filename))
    }

    fn by_content(&self, code: &str) -> Option<ResolvedLanguage<'_>> {
        let first_line = code.lines().next()?;
        let syntax = self.syntax_set.find_syntax_by_first_line(first_line)?;
        Some(ResolvedLanguage::from_syntax(syntax, Strategy::Content))
    }

    fn plain_text(&self, extension: &str) -> ResolvedLanguage<'_> {
        let lower = extension.to_ascii_lowercase();
        let name = match lookup(EXTENSION_OVERRIDES, &lower) {
            Some(name) => name.to_owned(),
            None if lower.is_empty() => "text".to_owned(),
            None => lower,
        };
        ResolvedLanguage {
            name,
            syntax: self.syntax_set.find_syntax_plain_text(),
            strategy: Strategy::PlainText,
        }
    }

    /// Resolution for a known language name. The grammar is looked up by
    /// name, then by the `extension` the name came from; it may be missing.
    fn named(&self, name: &str, extension: &str, strategy: Strategy) -> ResolvedLanguage<'_> {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(name)
            .or_else(|| self.syntax_set.find_syntax_by_extension(extension))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        ResolvedLanguage {
            name: name.to_owned(),
            syntax,
            strategy,
        }
    }
}

/// Result of language resolution.
#[derive(Debug, Clone)]
pub struct ResolvedLanguage<'a> {
    /// Language identifier used for the `language-*` class.
    pub name: String,
    /// Grammar used for highlighting (plain text when none is known).
    pub syntax: &'a SyntaxReference,
    pub strategy: Strategy,
}

impl<'a> ResolvedLanguage<'a> {
    fn from_syntax(syntax: &'a SyntaxReference, strategy: Strategy) -> Self {
        Self {
            name: language_id(syntax),
            syntax,
            strategy,
        }
    }
}

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, name)| *name)
}

fn container_suffix(lower: &str) -> Option<&'static str> {
    CONTAINER_STEMS
        .iter()
        .any(|stem| {
            lower
                .strip_suffix(stem)
                .is_some_and(|rest| rest.ends_with('.'))
        })
        .then_some("dockerfile")
}

fn container_prefix(lower: &str) -> Option<&'static str> {
    CONTAINER_STEMS
        .iter()
        .any(|stem| {
            lower
                .strip_prefix(stem)
                .is_some_and(|rest| rest.starts_with('.'))
        })
        .then_some("dockerfile")
}

/// Language identifier for a grammar found without a known name.
///
/// Single-word grammar names are used as-is (`Rust` → `rust`); descriptive
/// names fall back to the grammar's primary extension
/// (`Bourne Again Shell (bash)` → `sh` → `bash`).
fn language_id(syntax: &SyntaxReference) -> String {
    let name = syntax.name.to_ascii_lowercase();
    if name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '#' | '-' | '_'))
    {
        return name;
    }
    match syntax.file_extensions.first() {
        Some(extension) => {
            let lower = extension.to_ascii_lowercase();
            lookup(EXTENSION_OVERRIDES, &lower).map_or(lower, str::to_owned)
        }
        None => name.split_whitespace().collect::<Vec<_>>().join("-"),
    }
}
