use std::time::Duration;

/// Retry and throttling policy for the day-window news fetcher.
///
/// A day starts with `max_retries` retries in its budget. Every rate-limited or
/// network-failed attempt waits `backoff` and spends one retry; once the budget is
/// spent the next transient failure abandons the day. Independently, the fetcher
/// waits `inter_request_delay` between consecutive days.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    /// The maximum number of retries per day. The total number of attempts will be `max_retries + 1`.
    pub max_retries: u32,
    /// The fixed delay inserted before a retried request.
    pub backoff: Duration,
    /// The fixed delay between two consecutive days, regardless of outcome.
    pub inter_request_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: Duration::from_secs(10),
            inter_request_delay: Duration::from_secs(5),
        }
    }
}

impl RetryConfig {
    /// A policy with no waiting at all, keeping the retry budget. Handy for tests and replays.
    #[must_use]
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: Duration::ZERO,
            inter_request_delay: Duration::ZERO,
        }
    }
}
