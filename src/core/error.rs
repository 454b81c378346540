use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
///
/// Per-day news faults (rate limits, network hiccups, undecodable bodies) never surface
/// here; the day-window fetcher absorbs them. What remains are configuration mistakes,
/// price-provider failures and output I/O.
#[derive(Debug, Error)]
pub enum SgError {
    /// An error occurred during an HTTP request.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A provided URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The server returned an unexpected or unsuccessful HTTP status code.
    #[error("Unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned the error.
        url: String,
    },

    /// A response body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The data received from the API was in an unexpected format or was missing a required field.
    #[error("Data format unexpected or missing field: {0}")]
    Data(String),

    /// An invalid date range was provided (start must not be after end).
    #[error("invalid date range: start must not be after end")]
    InvalidDates,

    /// A news source failed below the HTTP layer (connection reset, DNS, timeout).
    #[error("transport failure: {0}")]
    Transport(String),

    /// Writing the output table failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
