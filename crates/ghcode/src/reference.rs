//! Parsing of GitHub file references.
//!
//! A reference points at a file on a branch and optionally at a line range:
//!
//! ```text
//! owner/repo/blob/branch/path/to/file.rs#L10-L20
//! https://github.com/owner/repo/blob/branch/path/to/file.rs#L10
//! ```
//!
//! The branch binds to the single segment after `blob/`; every further segment,
//! slashes included, belongs to the path.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

/// Host serving repository pages.
pub const GITHUB_HOST: &str = "github.com";

/// Host serving raw file contents.
pub const RAW_CONTENT_HOST: &str = "raw.githubusercontent.com";

static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?://github\.com/)?([^/]+)/([^/]+)/blob/([^/]+)/(.+?)(?:#L([0-9]+)(?:-L([0-9]+))?)?$",
    )
    .unwrap()
});

/// Inclusive, 1-indexed line window. `end` is absent for single-line references.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineRange {
    pub start: u32,
    pub end: Option<u32>,
}

impl LineRange {
    /// Last requested line (equal to `start` for single-line ranges).
    #[must_use]
    pub fn last(&self) -> u32 {
        self.end.unwrap_or(self.start)
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "L{}-L{end}", self.start),
            None => write!(f, "L{}", self.start),
        }
    }
}

/// Why a reference string was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidReason {
    #[error("expected owner/repo/blob/branch/path[#Lstart[-Lend]]")]
    Malformed,
    #[error("line numbers start at 1")]
    ZeroLine,
    #[error("line number {0} is too large")]
    LineOverflow(String),
    #[error("end line L{end} precedes start line L{start}")]
    InvertedRange { start: u32, end: u32 },
}

/// Error returned when a reference string cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{input:?}: {reason}")]
pub struct InvalidReferenceError {
    /// The original, untrimmed input.
    pub input: String,
    pub reason: InvalidReason,
}

/// A parsed GitHub file reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GithubReference {
    owner: String,
    repo: String,
    branch: String,
    path: String,
    lines: Option<LineRange>,
}

impl GithubReference {
    /// Parse a shorthand or full-URL reference.
    ///
    /// Surrounding whitespace is ignored. Inverted ranges such as `#L15-L5`
    /// and zero line numbers are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghcode::GithubReference;
    ///
    /// let reference = GithubReference::parse("owner/repo/blob/main/src/lib.rs#L3-L7").unwrap();
    /// assert_eq!(reference.path(), "src/lib.rs");
    /// assert_eq!(reference.start_line(), Some(3));
    /// assert_eq!(reference.end_line(), Some(7));
    /// ```
    pub fn parse(input: &str) -> Result<Self, InvalidReferenceError> {
        let invalid = |reason| InvalidReferenceError {
            input: input.to_owned(),
            reason,
        };

        let caps = REFERENCE_RE
            .captures(input.trim())
            .ok_or_else(|| invalid(InvalidReason::Malformed))?;

        let line = |index: usize| -> Result<Option<u32>, InvalidReferenceError> {
            let Some(m) = caps.get(index) else {
                return Ok(None);
            };
            let value: u32 = m
                .as_str()
                .parse()
                .map_err(|_| invalid(InvalidReason::LineOverflow(m.as_str().to_owned())))?;
            if value == 0 {
                return Err(invalid(InvalidReason::ZeroLine));
            }
            Ok(Some(value))
        };

        let lines = match (line(5)?, line(6)?) {
            (Some(start), Some(end)) if end < start => {
                return Err(invalid(InvalidReason::InvertedRange { start, end }));
            }
            (Some(start), end) => Some(LineRange { start, end }),
            // The end capture only exists inside the start group.
            (None, _) => None,
        };

        Ok(Self {
            owner: caps[1].to_owned(),
            repo: caps[2].to_owned(),
            branch: caps[3].to_owned(),
            path: caps[4].to_owned(),
            lines,
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// File path within the repository, without the line fragment.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn lines(&self) -> Option<LineRange> {
        self.lines
    }

    pub fn start_line(&self) -> Option<u32> {
        self.lines.map(|range| range.start)
    }

    pub fn end_line(&self) -> Option<u32> {
        self.lines.and_then(|range| range.end)
    }

    pub fn has_line_range(&self) -> bool {
        self.lines.is_some()
    }

    /// URL serving the file's raw bytes. This is the only URL that gets fetched.
    pub fn raw_content_url(&self) -> String {
        format!(
            "https://{RAW_CONTENT_HOST}/{}/{}/{}/{}",
            self.owner, self.repo, self.branch, self.path
        )
    }

    /// Human-facing page URL, including the line fragment when present.
    pub fn canonical_url(&self) -> String {
        let base = format!(
            "https://{GITHUB_HOST}/{}/{}/blob/{}/{}",
            self.owner, self.repo, self.branch, self.path
        );
        match self.lines {
            Some(range) => format!("{base}#{range}"),
            None => base,
        }
    }

    /// Last `/`-delimited segment of the path.
    pub fn filename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Text after the last `.` of the filename, or the whole filename if it
    /// has no dot (`Containerfile` stays `Containerfile`).
    pub fn extension(&self) -> &str {
        let filename = self.filename();
        filename
            .rsplit_once('.')
            .map_or(filename, |(_, extension)| extension)
    }

    /// Header suffix for the line range: `" (L5)"`, `" (L5-L15)"`, or empty.
    pub fn line_range_label(&self) -> String {
        self.lines
            .map(|range| format!(" ({range})"))
            .unwrap_or_default()
    }
}

impl FromStr for GithubReference {
    type Err = InvalidReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for GithubReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> GithubReference {
        GithubReference::parse(input).unwrap()
    }

    #[test]
    fn test_parse_shorthand() {
        let reference =
            parse("r0x0d/toolbox-dev/blob/main/toolbox/environment/fedora-packaging.Containerfile");
        assert_eq!(reference.owner(), "r0x0d");
        assert_eq!(reference.repo(), "toolbox-dev");
        assert_eq!(reference.branch(), "main");
        assert_eq!(
            reference.path(),
            "toolbox/environment/fedora-packaging.Containerfile"
        );
        assert_eq!(reference.start_line(), None);
        assert_eq!(reference.end_line(), None);
        assert!(!reference.has_line_range());
    }

    #[test]
    fn test_parse_single_line() {
        let reference = parse("r0x0d/toolbox-dev/blob/main/README.md#L5");
        assert_eq!(reference.path(), "README.md");
        assert_eq!(reference.start_line(), Some(5));
        assert_eq!(reference.end_line(), None);
        assert!(reference.has_line_range());
    }

    #[test]
    fn test_parse_line_range() {
        let reference = parse("r0x0d/toolbox-dev/blob/main/toolbox/a.Containerfile#L5-L15");
        assert_eq!(reference.path(), "toolbox/a.Containerfile");
        assert_eq!(
            reference.lines(),
            Some(LineRange {
                start: 5,
                end: Some(15)
            })
        );
    }

    #[test]
    fn test_parse_full_url() {
        let reference = parse("https://github.com/r0x0d/toolbox-dev/blob/main/src/app.py#L10-L20");
        assert_eq!(reference.owner(), "r0x0d");
        assert_eq!(reference.repo(), "toolbox-dev");
        assert_eq!(reference.branch(), "main");
        assert_eq!(reference.path(), "src/app.py");
        assert_eq!(reference.start_line(), Some(10));
        assert_eq!(reference.end_line(), Some(20));
    }

    #[test]
    fn test_parse_http_url() {
        let reference = parse("http://github.com/owner/repo/blob/main/a.rs");
        assert_eq!(reference.owner(), "owner");
        assert_eq!(reference.path(), "a.rs");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let reference = parse("  owner/repo/blob/main/a.rs#L2 \n");
        assert_eq!(reference.path(), "a.rs");
        assert_eq!(reference.start_line(), Some(2));
    }

    #[test]
    fn test_branch_binds_first_segment() {
        let reference = parse("owner/repo/blob/feature/my-branch/src/file.js");
        assert_eq!(reference.branch(), "feature");
        assert_eq!(reference.path(), "my-branch/src/file.js");
    }

    #[test]
    fn test_reject_invalid() {
        for input in ["invalid-reference", "", "   ", "owner/repo/tree/main/a.rs"] {
            let err = GithubReference::parse(input).unwrap_err();
            assert_eq!(err.reason, InvalidReason::Malformed, "input {input:?}");
            assert_eq!(err.input, input);
        }
    }

    #[test]
    fn test_reject_missing_path() {
        assert!(GithubReference::parse("owner/repo/blob/main").is_err());
        assert!(GithubReference::parse("owner/repo/blob/main/").is_err());
    }

    #[test]
    fn test_reject_other_host() {
        assert!(GithubReference::parse("https://gitlab.com/owner/repo/blob/main/a.rs").is_err());
    }

    #[test]
    fn test_reject_zero_line() {
        let err = GithubReference::parse("owner/repo/blob/main/a.rs#L0").unwrap_err();
        assert_eq!(err.reason, InvalidReason::ZeroLine);
    }

    #[test]
    fn test_reject_inverted_range() {
        let err = GithubReference::parse("owner/repo/blob/main/a.rs#L15-L5").unwrap_err();
        assert_eq!(err.reason, InvalidReason::InvertedRange { start: 15, end: 5 });
        assert!(err.to_string().contains("L5 precedes start line L15"));
    }

    #[test]
    fn test_equal_range_accepted() {
        let reference = parse("owner/repo/blob/main/a.rs#L7-L7");
        assert_eq!(reference.start_line(), Some(7));
        assert_eq!(reference.end_line(), Some(7));
    }

    #[test]
    fn test_reject_line_overflow() {
        let err = GithubReference::parse("owner/repo/blob/main/a.rs#L99999999999").unwrap_err();
        assert!(matches!(err.reason, InvalidReason::LineOverflow(_)));
    }

    #[test]
    fn test_malformed_fragment_joins_path() {
        // Anything that is not a line anchor stays part of the path.
        let reference = parse("owner/repo/blob/main/a.rs#section");
        assert_eq!(reference.path(), "a.rs#section");
        assert!(!reference.has_line_range());
    }

    #[test]
    fn test_raw_content_url() {
        let reference = parse("r0x0d/toolbox-dev/blob/main/README.md#L1-L2");
        assert_eq!(
            reference.raw_content_url(),
            "https://raw.githubusercontent.com/r0x0d/toolbox-dev/main/README.md"
        );
    }

    #[test]
    fn test_canonical_url_round_trips_fragment() {
        for fragment in ["", "#L5", "#L5-L15"] {
            let input = format!("r0x0d/toolbox-dev/blob/main/README.md{fragment}");
            assert_eq!(
                parse(&input).canonical_url(),
                format!("https://github.com/{input}")
            );
        }
    }

    #[test]
    fn test_display_is_canonical_url() {
        let reference: GithubReference = "owner/repo/blob/main/a.rs#L3".parse().unwrap();
        assert_eq!(
            reference.to_string(),
            "https://github.com/owner/repo/blob/main/a.rs#L3"
        );
    }

    #[test]
    fn test_filename_and_extension() {
        let reference = parse("owner/repo/blob/main/src/app.py");
        assert_eq!(reference.filename(), "app.py");
        assert_eq!(reference.extension(), "py");
    }

    #[test]
    fn test_extension_compound_name() {
        let reference = parse("owner/repo/blob/main/toolbox/fedora-packaging.Containerfile");
        assert_eq!(reference.filename(), "fedora-packaging.Containerfile");
        assert_eq!(reference.extension(), "Containerfile");
    }

    #[test]
    fn test_extension_without_dot() {
        let reference = parse("owner/repo/blob/main/Containerfile");
        assert_eq!(reference.extension(), "Containerfile");
    }

    #[test]
    fn test_line_range_label() {
        assert_eq!(parse("o/r/blob/b/a.rs").line_range_label(), "");
        assert_eq!(parse("o/r/blob/b/a.rs#L5").line_range_label(), " (L5)");
        assert_eq!(
            parse("o/r/blob/b/a.rs#L5-L15").line_range_label(),
            " (L5-L15)"
        );
    }
}
