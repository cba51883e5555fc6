//! HTML markup for code blocks and error fragments.
//!
//! Class names are the contract with the bundled stylesheet and copy script:
//! see [`crate::assets`].

use std::fmt::Write;

use crate::reference::GithubReference;

/// Container class of a rendered code block.
pub const BLOCK_CLASS: &str = "github-code-block";
/// Container class of an error fragment.
pub const ERROR_CLASS: &str = "github-code-error";

const GITHUB_ICON: &str = r#"<svg class="github-icon" viewBox="0 0 16 16" width="16" height="16" aria-hidden="true"><path fill="currentColor" d="M8 0C3.58 0 0 3.58 0 8c0 3.54 2.29 6.53 5.47 7.59.4.07.55-.17.55-.38 0-.19-.01-.82-.01-1.49-2.01.37-2.53-.49-2.69-.94-.09-.23-.48-.94-.82-1.13-.28-.15-.68-.52-.01-.53.63-.01 1.08.58 1.23.82.72 1.21 1.87.87 2.33.66.07-.52.28-.87.51-1.07-1.78-.2-3.64-.89-3.64-3.95 0-.87.31-1.59.82-2.15-.08-.2-.36-1.02.08-2.12 0 0 .67-.21 2.2.82.64-.18 1.32-.27 2-.27.68 0 1.36.09 2 .27 1.53-1.04 2.2-.82 2.2-.82.44 1.1.16 1.92.08 2.12.51.56.82 1.27.82 2.15 0 3.07-1.87 3.75-3.65 3.95.29.25.54.73.54 1.48 0 1.07-.01 1.93-.01 2.2 0 .21.15.46.55.38A8.013 8.013 0 0016 8c0-4.42-3.58-8-8-8z"/></svg>"#;

const COPY_ICON: &str = r#"<svg viewBox="0 0 16 16" width="16" height="16" aria-hidden="true"><path fill="currentColor" d="M0 6.75C0 5.784.784 5 1.75 5h1.5a.75.75 0 010 1.5h-1.5a.25.25 0 00-.25.25v7.5c0 .138.112.25.25.25h7.5a.25.25 0 00.25-.25v-1.5a.75.75 0 011.5 0v1.5A1.75 1.75 0 019.25 16h-7.5A1.75 1.75 0 010 14.25v-7.5z"/><path fill="currentColor" d="M5 1.75C5 .784 5.784 0 6.75 0h7.5C15.216 0 16 .784 16 1.75v7.5A1.75 1.75 0 0114.25 11h-7.5A1.75 1.75 0 015 9.25v-7.5zm1.75-.25a.25.25 0 00-.25.25v7.5c0 .138.112.25.25.25h7.5a.25.25 0 00.25-.25v-7.5a.25.25 0 00-.25-.25h-7.5z"/></svg>"#;

/// Escape text for use in HTML content and double- or single-quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Assemble the code block around already-escaped `code_html`.
pub(crate) fn code_block(reference: &GithubReference, language: &str, code_html: &str) -> String {
    let mut out = String::with_capacity(code_html.len() + 2048);
    write!(
        out,
        r#"<div class="{BLOCK_CLASS}"><div class="github-code-header"><span class="github-code-filename">{GITHUB_ICON}<a href="{href}" target="_blank" rel="noopener noreferrer">{filename}{range}</a></span>"#,
        href = escape_html(&reference.canonical_url()),
        filename = escape_html(reference.filename()),
        range = reference.line_range_label(),
    )
    .unwrap();
    write!(
        out,
        r#"<button class="github-code-copy" type="button" title="Copy code" aria-label="Copy code">{COPY_ICON}</button></div>"#
    )
    .unwrap();
    write!(
        out,
        r#"<div class="github-code-content"><pre><code class="language-{language}">{code_html}</code></pre></div></div>"#,
        language = escape_html(language),
    )
    .unwrap();
    out
}

/// Inline error fragment shown in place of a code block.
pub fn error_block(message: &str) -> String {
    format!(
        r#"<div class="{ERROR_CLASS}"><strong>GitHub Code Error:</strong> {}</div>"#,
        escape_html(message)
    )
}
