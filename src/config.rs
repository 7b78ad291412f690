// src/config.rs
// =============================================================================
// Runtime settings for talking to the CDX index server.
//
// Everything that used to be a hidden constant (base URL, user agent,
// timeouts, number of attempts) lives here so the CLI can override it and
// tests can build their own values.
// =============================================================================

use std::time::Duration;

/// Default CDX server (Common Crawl).
pub const DEFAULT_BASE_URL: &str = "https://index.commoncrawl.org";

/// The index server rejects some default client identifications, so we
/// present ourselves as a desktop browser.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:139.0) Gecko/20100101 Firefox/139.0";

pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_CATALOG_TIMEOUT: Duration = Duration::from_secs(15);

/// How many times a failed index query is tried again, and how long we
/// wait in between.
///
/// `retries = 0` means exactly one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    /// A single attempt, no waiting.
    pub fn none() -> Self {
        Self {
            retries: 0,
            backoff: Duration::ZERO,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 0,
            backoff: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Base URL without trailing slash, e.g. `https://index.commoncrawl.org`
    pub base_url: String,
    pub user_agent: String,
    pub query_timeout: Duration,
    pub catalog_timeout: Duration,
    pub retry: RetryPolicy,
}

impl QueryConfig {
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn catalog_url(&self) -> String {
        format!("{}/collinfo.json", self.base_url)
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: BROWSER_USER_AGENT.to_string(),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            catalog_timeout: DEFAULT_CATALOG_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}
