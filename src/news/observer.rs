//! Observability sink for the day-window fetcher.

use chrono::NaiveDate;
use std::time::Duration;

use crate::news::model::{AbandonReason, ContentFault, Tier, TransientFault};

/// A state transition of the day-window fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEvent {
    RangeStarted {
        company: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    /// A request for `date` is about to be sent. `attempt` starts at 1.
    Requesting { date: NaiveDate, attempt: u32 },
    /// A transient fault spent one retry; the request is repeated after `backoff`.
    RetryScheduled {
        date: NaiveDate,
        fault: TransientFault,
        retries_left: u32,
        backoff: Duration,
    },
    /// The response decoded into `articles` articles.
    Decoded { date: NaiveDate, articles: usize },
    /// A row was emitted for `date`.
    Emitted {
        date: NaiveDate,
        tier: Tier,
        headlines: usize,
    },
    /// Nothing survived filtering for `date`.
    NoMatches { date: NaiveDate },
    Abandoned {
        date: NaiveDate,
        reason: AbandonReason,
    },
    RangeFinished { days: usize, rows: usize },
}

/// Receives every [`FetchEvent`] of a fetch, in order.
pub trait FetchObserver: Send + Sync {
    fn on_event(&self, event: &FetchEvent);
}

/// Forwards events to `tracing`. Retries log at warn level, abandoned days at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl FetchObserver for TracingObserver {
    fn on_event(&self, event: &FetchEvent) {
        match event {
            FetchEvent::RangeStarted {
                company,
                start,
                end,
            } => {
                tracing::info!(%company, %start, %end, "fetching finance-related news");
            }
            FetchEvent::Requesting { date, attempt } => {
                tracing::debug!(%date, attempt, "requesting day window");
            }
            FetchEvent::RetryScheduled {
                date,
                fault,
                retries_left,
                backoff,
            } => {
                tracing::warn!(%date, %fault, retries_left, backoff_ms = backoff.as_millis() as u64, "retrying day");
            }
            FetchEvent::Decoded { date, articles } => {
                tracing::debug!(%date, articles, "decoded articles");
            }
            FetchEvent::Emitted {
                date,
                tier,
                headlines,
            } => {
                tracing::debug!(%date, ?tier, headlines, "headlines selected");
            }
            FetchEvent::NoMatches { date } => {
                tracing::debug!(%date, "no relevant articles");
            }
            FetchEvent::Abandoned { date, reason } => match reason {
                AbandonReason::Content(ContentFault::MissingArticles) => {
                    tracing::info!(%date, %reason, "day abandoned");
                }
                _ => tracing::error!(%date, %reason, "day abandoned"),
            },
            FetchEvent::RangeFinished { days, rows } => {
                tracing::info!(days, rows, "retrieved days of news");
            }
        }
    }
}
