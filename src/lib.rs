//! stock-gdelt-rs: daily price history joined with relevance-filtered news headlines.
//!
//! The crate fetches daily bars for one ticker from the Yahoo chart API, computes
//! returns and EMAs, searches GDELT one calendar day at a time for headlines about the
//! company, keeps the most market-relevant ones and writes the merged table to CSV.
//!
//! - [`HistoryBuilder`] fetches prices and applies [`indicators`].
//! - [`NewsBuilder`] runs the day-window news fetch.
//! - [`DatasetBuilder`] drives both per year and appends to the output file.

pub mod core;
pub mod dataset;
pub mod history;
pub mod indicators;
pub mod news;
pub mod text;

pub use core::{DailyNewsRow, PriceBar, RetryConfig, SgClient, SgClientBuilder, SgError};
pub use dataset::{DatasetBuilder, DatasetRow, DatasetWriter, RunSummary, YearStatus, YearSummary};
pub use history::HistoryBuilder;
pub use news::{
    ArticleRecord, DayOutcome, FetchEvent, FetchObserver, FetchReport, KeywordSet, NewsBuilder,
    NewsSource, TracingObserver,
};
