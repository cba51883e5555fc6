//! Blocking HTTP fetcher with a bounded redirect loop.

use std::time::{Duration, Instant};

use ureq::Agent;
use ureq::http::Uri;
use ureq::http::header::LOCATION;

use super::{ContentSource, FetchError, FetchErrorKind};

/// Default timeout per logical fetch, redirects included.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of redirects followed before failing.
const DEFAULT_MAX_REDIRECTS: u32 = 5;

/// Create an HTTP agent that reports statuses and redirects instead of
/// handling them, so [`HttpFetcher`] can run the redirect loop itself.
fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .max_redirects(0)
        .max_redirects_will_error(false)
        .build()
        .into()
}

/// Fetches raw content over HTTP(S), following redirects up to a limit.
///
/// One call performs exactly one logical fetch: no retries, no caching.
///
/// # Example
///
/// ```no_run
/// use std::time::{Duration, Instant};
/// use ghcode::{ContentSource, HttpFetcher};
///
/// let fetcher = HttpFetcher::new()
///     .timeout(Duration::from_secs(10))
///     .max_redirects(3);
/// let body = fetcher.fetch("https://raw.githubusercontent.com/rust-lang/rust/master/README.md")?;
/// # Ok::<(), ghcode::FetchError>(())
/// ```
#[derive(Clone)]
pub struct HttpFetcher {
    agent: Agent,
    timeout: Duration,
    max_redirects: u32,
    user_agent: String,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self {
            agent: create_agent(DEFAULT_TIMEOUT),
            timeout: DEFAULT_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: concat!("ghcode/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl HttpFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout for one logical fetch. The deadline spans every
    /// redirect hop: each request only gets the time that remains.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.agent = create_agent(timeout);
        self.timeout = timeout;
        self
    }

    /// Set how many redirects are followed before failing.
    ///
    /// Zero means any redirect response is an error.
    #[must_use]
    pub fn max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Set the `User-Agent` header sent with each request.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl ContentSource for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut current = url.to_owned();
        let mut hops = 0;
        let deadline = Instant::now() + self.timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(FetchError::new(
                    current,
                    FetchErrorKind::Transport(format!("timed out after {:?}", self.timeout)),
                ));
            }
            tracing::debug!(url = %current, "Fetching content");

            let response = self
                .agent
                .get(&current)
                .header("User-Agent", self.user_agent.as_str())
                .config()
                .timeout_global(Some(remaining))
                .build()
                .call()
                .map_err(|e| FetchError::new(&current, FetchErrorKind::Transport(e.to_string())))?;

            let status = response.status();

            if status.is_success() {
                let bytes = response
                    .into_body()
                    .read_to_vec()
                    .map_err(|e| FetchError::new(&current, FetchErrorKind::Body(e.to_string())))?;
                return Ok(String::from_utf8_lossy(&bytes).into_owned());
            }

            if !status.is_redirection() {
                return Err(FetchError::new(
                    current,
                    FetchErrorKind::Status {
                        status: status.as_u16(),
                        reason: status.canonical_reason().unwrap_or_default().to_owned(),
                    },
                ));
            }

            if hops >= self.max_redirects {
                return Err(FetchError::new(
                    current,
                    FetchErrorKind::TooManyRedirects(self.max_redirects),
                ));
            }

            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .ok_or_else(|| {
                    FetchError::new(&current, FetchErrorKind::MissingLocation(status.as_u16()))
                })?;
            let next = resolve_location(&current, location).ok_or_else(|| {
                FetchError::new(
                    &current,
                    FetchErrorKind::InvalidLocation(location.to_owned()),
                )
            })?;

            tracing::debug!(from = %current, to = %next, status = status.as_u16(), "Following redirect");
            hops += 1;
            current = next;
        }
    }
}

/// Resolve a `Location` header value against the URL that produced it.
///
/// Handles absolute URLs, scheme-relative (`//host/path`), absolute-path and
/// relative-path references. Returns `None` if `base` is not an absolute URL.
fn resolve_location(base: &str, location: &str) -> Option<String> {
    let location = location.trim();
    if location.is_empty() {
        return None;
    }
    if location.starts_with("http://") || location.starts_with("https://") {
        return Some(location.to_owned());
    }

    let uri: Uri = base.parse().ok()?;
    let scheme = uri.scheme_str()?;
    let authority = uri.authority()?.as_str();

    if let Some(rest) = location.strip_prefix("//") {
        return Some(format!("{scheme}://{rest}"));
    }
    if location.starts_with('/') {
        return Some(format!("{scheme}://{authority}{location}"));
    }

    let path = uri.path();
    let dir = path.rsplit_once('/').map_or("", |(dir, _)| dir);
    Some(format!("{scheme}://{authority}{dir}/{location}"))
}
