//! Retrieval of raw file contents.
//!
//! [`ContentSource`] is the seam between the embedding adapter and the
//! network. [`HttpFetcher`] is the production implementation; [`MockSource`]
//! serves canned responses for tests and offline builds.

mod http;
mod mock;

pub use http::HttpFetcher;
pub use mock::MockSource;

/// Source of raw file contents, addressed by URL.
///
/// Implementations must be safe to share across threads: the tag registry
/// renders independent tags in parallel.
pub trait ContentSource: Send + Sync {
    /// Fetch the full text body served at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request fails, ends in a non-success
    /// status, or exceeds the redirect limit.
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Failure to retrieve content from a URL.
#[derive(Debug, thiserror::Error)]
#[error("{url}: {kind}")]
pub struct FetchError {
    /// URL of the request that failed (the last hop for redirect chains).
    pub url: String,
    pub kind: FetchErrorKind,
}

impl FetchError {
    pub(crate) fn new(url: impl Into<String>, kind: FetchErrorKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }

    /// HTTP status of the terminal response, if the failure was a status error.
    pub fn status(&self) -> Option<u16> {
        match self.kind {
            FetchErrorKind::Status { status, .. } => Some(status),
            _ => None,
        }
    }
}

/// Kind of fetch failure.
#[derive(Debug, thiserror::Error)]
pub enum FetchErrorKind {
    #[error("HTTP {status} {reason}")]
    Status { status: u16, reason: String },
    #[error("{0}")]
    Transport(String),
    #[error("too many redirects (limit {0})")]
    TooManyRedirects(u32),
    #[error("HTTP {0} redirect without Location header")]
    MissingLocation(u16),
    #[error("invalid redirect target {0:?}")]
    InvalidLocation(String),
    #[error("failed to read response body: {0}")]
    Body(String),
}
