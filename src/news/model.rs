use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

use crate::core::DailyNewsRow;
use crate::news::decode::Undecodable;

/// One article returned by the news search for a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRecord {
    /// The headline of the article.
    pub title: String,
    /// A short excerpt of the body, when the provider sent one.
    pub summary: Option<String>,
    /// The language tag as sent by the provider (e.g., "English").
    pub language: Option<String>,
    /// A direct link to the article.
    pub url: Option<String>,
    /// The publishing domain (e.g., "reuters.com").
    pub domain: Option<String>,
    /// When the crawler first saw the article, in UTC.
    pub seen_at: Option<NaiveDateTime>,
}

impl ArticleRecord {
    /// An English article with only a title, mostly useful in tests.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: None,
            language: Some("English".to_string()),
            url: None,
            domain: None,
            seen_at: None,
        }
    }
}

/// Which relevance tier let a day's articles through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tier {
    /// Company keyword plus an impact keyword (or "stock"/"shares").
    Primary,
    /// Company keyword only; used when nothing passed the primary tier.
    Fallback,
}

/// A failure worth retrying after a backoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransientFault {
    /// The provider asked us to slow down.
    RateLimited,
    /// The request never produced a response.
    Network(String),
}

impl fmt::Display for TransientFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransientFault::RateLimited => f.write_str("rate limited"),
            TransientFault::Network(reason) => write!(f, "network error: {reason}"),
        }
    }
}

/// A response that arrived but cannot yield articles. Retrying will not help.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFault {
    Undecodable(Undecodable),
    MissingArticles,
}

impl fmt::Display for ContentFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentFault::Undecodable(u) => write!(f, "undecodable body ({u})"),
            ContentFault::MissingArticles => f.write_str("no article list in response"),
        }
    }
}

/// Why a day produced no row without ever reaching the relevance filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbandonReason {
    RetriesExhausted(TransientFault),
    Content(ContentFault),
}

impl fmt::Display for AbandonReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbandonReason::RetriesExhausted(last) => write!(f, "retries exhausted, last fault: {last}"),
            AbandonReason::Content(fault) => write!(f, "{fault}"),
        }
    }
}

/// What happened to one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayOutcome {
    /// A row was emitted with `headlines` titles.
    Emitted { tier: Tier, headlines: usize },
    /// Articles were decoded but none survived filtering.
    NoMatches,
    /// The day was given up on.
    Abandoned(AbandonReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayReport {
    pub date: NaiveDate,
    pub outcome: DayOutcome,
    /// Retries spent from the day's budget.
    pub retries_used: u32,
}

/// Everything a day-window fetch produced: the rows plus a per-day account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub rows: Vec<DailyNewsRow>,
    pub days: Vec<DayReport>,
}

impl FetchReport {
    /// Number of days that were abandoned.
    pub fn abandoned_days(&self) -> usize {
        self.days
            .iter()
            .filter(|d| matches!(d.outcome, DayOutcome::Abandoned(_)))
            .count()
    }
}
