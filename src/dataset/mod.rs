//! Merging prices with headlines and writing the output table, one block per year.

mod export;
mod merge;

pub use export::DatasetWriter;
pub use merge::{DatasetRow, left_join};

use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    core::{RetryConfig, SgClient, SgError},
    history::HistoryBuilder,
    news::{DEFAULT_TOP_N, FetchObserver, NewsBuilder},
};

/// What happened to one year of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearStatus {
    /// The year's block was appended to the output.
    Written,
    /// The price fetch failed; nothing was written for the year.
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSummary {
    pub year: i32,
    pub status: YearStatus,
    /// Rows appended for the year (one per trading day).
    pub rows: usize,
    /// Trading days that got headlines.
    pub days_with_news: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub years: Vec<YearSummary>,
}

impl RunSummary {
    pub fn rows_written(&self) -> usize {
        self.years.iter().map(|y| y.rows).sum()
    }
}

/// Builds the price + headline dataset for one company over a span of calendar years.
///
/// Each year runs the price fetch, the day-window news fetch and a left join, then
/// appends the result to the output CSV. A year whose prices cannot be fetched is
/// logged and skipped.
pub struct DatasetBuilder<'a> {
    client: &'a SgClient,
    ticker: String,
    company: String,
    keywords: Option<Vec<String>>,
    years: (i32, i32),
    output: PathBuf,
    top_n: usize,
    retry: Option<RetryConfig>,
    observer: Option<Arc<dyn FetchObserver>>,
}

impl<'a> DatasetBuilder<'a> {
    /// The output path defaults to `<TICKER>_stock_gdelt_final.csv` and the years to 2021..=2024.
    pub fn new(client: &'a SgClient, ticker: impl Into<String>, company: impl Into<String>) -> Self {
        let ticker = ticker.into();
        let output = PathBuf::from(format!("{ticker}_stock_gdelt_final.csv"));
        Self {
            client,
            ticker,
            company: company.into(),
            keywords: None,
            years: (2021, 2024),
            output,
            top_n: DEFAULT_TOP_N,
            retry: None,
            observer: None,
        }
    }

    #[must_use]
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }

    /// Inclusive span of calendar years.
    #[must_use]
    pub const fn years(mut self, first: i32, last: i32) -> Self {
        self.years = (first, last);
        self
    }

    #[must_use]
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = path.into();
        self
    }

    #[must_use]
    pub const fn top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }

    /// Overrides the client's retry policy for the news fetches.
    #[must_use]
    pub fn retry_policy(mut self, cfg: RetryConfig) -> Self {
        self.retry = Some(cfg);
        self
    }

    #[must_use]
    pub fn observer(mut self, observer: Arc<dyn FetchObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// # Errors
    ///
    /// Returns `SgError::InvalidDates` for a reversed or out-of-range year span and
    /// `SgError::Io`/`SgError::Csv` when the output cannot be written. Price failures
    /// for a single year are reported in the summary instead.
    #[tracing::instrument(skip(self), err, fields(ticker = %self.ticker, company = %self.company))]
    pub async fn run(self) -> Result<RunSummary, SgError> {
        let (first, last) = self.years;
        if first > last {
            return Err(SgError::InvalidDates);
        }

        let mut writer = DatasetWriter::create(&self.output)?;
        let mut summary = RunSummary {
            output: self.output.clone(),
            years: Vec::new(),
        };

        for year in first..=last {
            let (Some(start), Some(end)) = (
                NaiveDate::from_ymd_opt(year, 1, 1),
                NaiveDate::from_ymd_opt(year, 12, 31),
            ) else {
                return Err(SgError::InvalidDates);
            };
            tracing::info!(year, "fetching data for year");

            let bars = match HistoryBuilder::new(self.client, &self.ticker)
                .company(&self.company)
                .between(start, end)
                .fetch()
                .await
            {
                Ok(bars) => bars,
                Err(e) => {
                    tracing::error!(year, error = %e, "price fetch failed; skipping year");
                    summary.years.push(YearSummary {
                        year,
                        status: YearStatus::Skipped(e.to_string()),
                        rows: 0,
                        days_with_news: 0,
                    });
                    continue;
                }
            };

            let mut news = NewsBuilder::new(self.client, &self.ticker, &self.company)
                .between(start, end)
                .top_n(self.top_n);
            if let Some(keywords) = &self.keywords {
                news = news.keywords(keywords.iter().cloned());
            }
            if let Some(retry) = &self.retry {
                news = news.retry_policy(retry.clone());
            }
            if let Some(observer) = &self.observer {
                news = news.observer(Arc::clone(observer));
            }
            let news_rows = news.fetch().await?;

            tracing::info!(year, "merging stock and news data");
            let merged = left_join(&bars, &news_rows);
            let days_with_news = merged.iter().filter(|r| r.headlines.is_some()).count();
            writer.append_block(&merged)?;
            tracing::info!(year, rows = merged.len(), output = %writer.path().display(), "year saved");

            summary.years.push(YearSummary {
                year,
                status: YearStatus::Written,
                rows: merged.len(),
                days_with_news,
            });
        }

        Ok(summary)
    }
}
