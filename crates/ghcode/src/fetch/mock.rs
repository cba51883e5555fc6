//! In-memory content source.

use std::collections::HashMap;

use super::{ContentSource, FetchError, FetchErrorKind};

#[derive(Clone, Debug)]
enum MockResponse {
    Body(String),
    Status(u16),
}

/// Content source serving canned responses from memory.
///
/// URLs without a registered response fail with HTTP 404.
///
/// # Example
///
/// ```
/// use ghcode::{ContentSource, MockSource};
///
/// let source = MockSource::new()
///     .with_content("https://example.test/a.rs", "fn main() {}")
///     .with_status("https://example.test/gone.rs", 410);
///
/// assert_eq!(source.fetch("https://example.test/a.rs").unwrap(), "fn main() {}");
/// assert_eq!(source.fetch("https://example.test/gone.rs").unwrap_err().status(), Some(410));
/// ```
#[derive(Clone, Debug, Default)]
pub struct MockSource {
    responses: HashMap<String, MockResponse>,
}

impl MockSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    #[must_use]
    pub fn with_content(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses
            .insert(url.into(), MockResponse::Body(body.into()));
        self
    }

    /// Fail requests for `url` with the given HTTP status.
    #[must_use]
    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses.insert(url.into(), MockResponse::Status(status));
        self
    }
}

impl ContentSource for MockSource {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        match self.responses.get(url) {
            Some(MockResponse::Body(body)) => Ok(body.clone()),
            Some(MockResponse::Status(status)) => Err(status_error(url, *status)),
            None => Err(status_error(url, 404)),
        }
    }
}

fn status_error(url: &str, status: u16) -> FetchError {
    let reason = ureq::http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or_default();
    FetchError::new(
        url,
        FetchErrorKind::Status {
            status,
            reason: reason.to_owned(),
        },
    )
}
