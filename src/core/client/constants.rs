//! Centralized constants for default endpoints and UA.

/// Default desktop UA to avoid trivial bot blocking.
pub(crate) const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (X11; Linux x86_64) ",
    "AppleWebKit/537.36 (KHTML, like Gecko) ",
    "Chrome/122.0.0.0 Safari/537.36"
);

/// Yahoo chart API base (symbol is appended).
pub(crate) const DEFAULT_BASE_CHART: &str = "https://query1.finance.yahoo.com/v8/finance/chart/";

/// GDELT DOC 2.0 article search endpoint.
pub(crate) const DEFAULT_BASE_GDELT: &str = "https://api.gdeltproject.org/api/v2/doc/doc";

/// Per-request timeout applied unless the builder overrides it.
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 15;
