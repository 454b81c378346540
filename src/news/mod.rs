//! Day-by-day news retrieval for one company.
//!
//! For every calendar day in a range the fetcher issues one search request, decodes the
//! response, filters it for relevance and keeps the best headlines. Days are processed
//! strictly one after another with a throttling delay in between; see [`RetryConfig`]
//! for the retry and delay policy.

mod api;
pub mod decode;
mod model;
pub mod observer;
pub mod relevance;
mod source;
mod wire;

pub use model::{
    AbandonReason, ArticleRecord, ContentFault, DayOutcome, DayReport, FetchReport, Tier,
    TransientFault,
};
pub use observer::{FetchEvent, FetchObserver, TracingObserver};
pub use relevance::{DEFAULT_TOP_N, KeywordSet};
pub use source::{DayQuery, MAX_RECORDS, NewsSource, SourceResponse};

use chrono::NaiveDate;
use std::sync::Arc;

use crate::{
    core::{DailyNewsRow, RetryConfig, SgClient, SgError},
    text::strip_symbols,
};

/// Phrase GDELT puts in its plaintext throttling notice.
pub const DEFAULT_RATE_LIMIT_MARKER: &str = "Please limit requests";

/// A builder for fetching relevance-filtered daily headlines for one company.
///
/// # Example
///
/// ```no_run
/// # use stock_gdelt::{NewsBuilder, SgClient};
/// # use chrono::NaiveDate;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = SgClient::default();
/// let rows = NewsBuilder::new(&client, "AMZN", "Amazon.com Inc.")
///     .keywords(["AMZN", "Amazon", "AWS", "Andy Jassy"])
///     .between(
///         NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///         NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
///     )
///     .fetch()
///     .await?;
/// println!("{} days with headlines", rows.len());
/// # Ok(())
/// # }
/// ```
pub struct NewsBuilder {
    source: Arc<dyn NewsSource>,
    ticker: String,
    company: String,
    keywords: Option<Vec<String>>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    top_n: usize,
    retry: RetryConfig,
    rate_limit_marker: String,
    observer: Arc<dyn FetchObserver>,
}

impl NewsBuilder {
    /// Creates a new `NewsBuilder` searching GDELT through `client`.
    /// The client's retry policy is used unless overridden.
    pub fn new(client: &SgClient, ticker: impl Into<String>, company: impl Into<String>) -> Self {
        let retry = client.retry_config().clone();
        Self::from_source(Arc::new(client.clone()), ticker, company).retry_policy(retry)
    }

    /// Creates a new `NewsBuilder` over any [`NewsSource`].
    pub fn from_source(
        source: Arc<dyn NewsSource>,
        ticker: impl Into<String>,
        company: impl Into<String>,
    ) -> Self {
        Self {
            source,
            ticker: ticker.into(),
            company: company.into(),
            keywords: None,
            start: None,
            end: None,
            top_n: DEFAULT_TOP_N,
            retry: RetryConfig::default(),
            rate_limit_marker: DEFAULT_RATE_LIMIT_MARKER.to_string(),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Sets the company keywords (ticker, aliases, executives, products).
    /// Defaults to the ticker and the company name.
    #[must_use]
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the inclusive range of calendar days to fetch.
    #[must_use]
    pub const fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Sets the maximum number of headlines kept per day. Default: 5.
    #[must_use]
    pub const fn top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }

    /// Overrides the retry and throttling policy for this fetch.
    #[must_use]
    pub fn retry_policy(mut self, cfg: RetryConfig) -> Self {
        self.retry = cfg;
        self
    }

    /// Overrides the phrase that marks a plaintext rate-limit notice.
    #[must_use]
    pub fn rate_limit_marker(mut self, marker: impl Into<String>) -> Self {
        self.rate_limit_marker = marker.into();
        self
    }

    /// Sends fetch events to `observer` instead of `tracing`.
    #[must_use]
    pub fn observer(mut self, observer: Arc<dyn FetchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Executes the fetch and returns one row per day that had relevant headlines,
    /// in date order.
    ///
    /// # Errors
    ///
    /// Returns `SgError` only for an invalid configuration: no date range, a start after
    /// the end, or a company/ticker that cleans to an empty query. Failed days are skipped,
    /// never reported as errors.
    pub async fn fetch(self) -> Result<Vec<DailyNewsRow>, SgError> {
        Ok(self.fetch_report().await?.rows)
    }

    /// Like [`fetch`](Self::fetch), but also returns the outcome of every day.
    ///
    /// # Errors
    ///
    /// Same as [`fetch`](Self::fetch).
    #[tracing::instrument(skip(self), err, fields(ticker = %self.ticker, company = %self.company))]
    pub async fn fetch_report(self) -> Result<FetchReport, SgError> {
        let (Some(start), Some(end)) = (self.start, self.end) else {
            return Err(SgError::Data("no date range set".into()));
        };
        if start > end {
            return Err(SgError::InvalidDates);
        }

        let mut query = strip_symbols(&self.company);
        if query.is_empty() {
            query = strip_symbols(&self.ticker);
        }
        if query.is_empty() {
            return Err(SgError::Data(format!(
                "company {:?} and ticker {:?} yield an empty search query",
                self.company, self.ticker
            )));
        }

        let keywords = match &self.keywords {
            Some(list) => KeywordSet::new(list),
            None => KeywordSet::new([self.ticker.as_str(), self.company.as_str()]),
        };
        if keywords.is_empty() {
            tracing::warn!("no usable company keywords; every day will come back empty");
        }

        let req = api::RangeRequest {
            query,
            ticker: self.ticker,
            company: self.company,
            keywords,
            start,
            end,
            top_n: self.top_n,
            rate_limit_marker: self.rate_limit_marker,
        };

        Ok(api::fetch_range(self.source.as_ref(), &req, &self.retry, self.observer.as_ref()).await)
    }
}
