use chrono::NaiveDate;

use crate::{
    core::{DailyNewsRow, HEADLINE_DELIMITER, RetryConfig, SgError},
    news::{
        decode::decode_body,
        model::{
            AbandonReason, ArticleRecord, ContentFault, DayOutcome, DayReport, FetchReport,
            TransientFault,
        },
        observer::{FetchEvent, FetchObserver},
        relevance::{KeywordSet, rank_day},
        source::{DayQuery, NewsSource, SourceResponse},
        wire,
    },
};

/// Everything that stays fixed across the days of one fetch.
pub(super) struct RangeRequest {
    pub(super) query: String,
    pub(super) ticker: String,
    pub(super) company: String,
    pub(super) keywords: KeywordSet,
    pub(super) start: NaiveDate,
    pub(super) end: NaiveDate,
    pub(super) top_n: usize,
    pub(super) rate_limit_marker: String,
}

/// The interpretation of one request, as consumed by the per-day state machine.
#[derive(Debug)]
pub(crate) enum Attempt {
    Success(Vec<ArticleRecord>),
    Transient(TransientFault),
    Terminal(ContentFault),
}

pub(crate) fn classify(
    result: Result<SourceResponse, SgError>,
    tag: &str,
    rate_limit_marker: &str,
) -> Attempt {
    let resp = match result {
        Ok(resp) => resp,
        Err(e) => return Attempt::Transient(TransientFault::Network(e.to_string())),
    };

    if resp.status == 429 || (!rate_limit_marker.is_empty() && resp.body.contains(rate_limit_marker)) {
        return Attempt::Transient(TransientFault::RateLimited);
    }

    match decode_body(&resp.body, tag) {
        Err(u) => Attempt::Terminal(ContentFault::Undecodable(u)),
        Ok(value) => match wire::articles_from_value(value) {
            Some(articles) => Attempt::Success(articles),
            None => Attempt::Terminal(ContentFault::MissingArticles),
        },
    }
}

pub(super) async fn fetch_range(
    source: &dyn NewsSource,
    req: &RangeRequest,
    policy: &RetryConfig,
    observer: &dyn FetchObserver,
) -> FetchReport {
    observer.on_event(&FetchEvent::RangeStarted {
        company: req.company.clone(),
        start: req.start,
        end: req.end,
    });

    let mut report = FetchReport::default();
    let mut day = req.start;
    loop {
        let (day_report, row) = fetch_day(source, req, day, policy, observer).await;
        report.days.push(day_report);
        report.rows.extend(row);

        match day.succ_opt() {
            Some(next) if next <= req.end => {
                if !policy.inter_request_delay.is_zero() {
                    tokio::time::sleep(policy.inter_request_delay).await;
                }
                day = next;
            }
            _ => break,
        }
    }

    observer.on_event(&FetchEvent::RangeFinished {
        days: report.days.len(),
        rows: report.rows.len(),
    });
    report
}

async fn fetch_day(
    source: &dyn NewsSource,
    req: &RangeRequest,
    date: NaiveDate,
    policy: &RetryConfig,
    observer: &dyn FetchObserver,
) -> (DayReport, Option<DailyNewsRow>) {
    let query = DayQuery::for_day(req.query.clone(), date);
    let tag = date.to_string();
    let mut retries_left = policy.max_retries;
    let mut attempt = 0u32;

    let articles = loop {
        attempt += 1;
        observer.on_event(&FetchEvent::Requesting { date, attempt });

        let result = source.search(&query).await;
        match classify(result, &tag, &req.rate_limit_marker) {
            Attempt::Success(articles) => break articles,
            Attempt::Transient(fault) => {
                if retries_left == 0 {
                    let reason = AbandonReason::RetriesExhausted(fault);
                    return abandon(date, reason, policy.max_retries, observer);
                }
                retries_left -= 1;
                observer.on_event(&FetchEvent::RetryScheduled {
                    date,
                    fault,
                    retries_left,
                    backoff: policy.backoff,
                });
                if !policy.backoff.is_zero() {
                    tokio::time::sleep(policy.backoff).await;
                }
            }
            Attempt::Terminal(fault) => {
                let used = policy.max_retries - retries_left;
                return abandon(date, AbandonReason::Content(fault), used, observer);
            }
        }
    };
    let retries_used = policy.max_retries - retries_left;

    observer.on_event(&FetchEvent::Decoded {
        date,
        articles: articles.len(),
    });

    let selected = rank_day(&articles, &req.keywords, req.top_n);
    if selected.articles.is_empty() {
        observer.on_event(&FetchEvent::NoMatches { date });
        let report = DayReport {
            date,
            outcome: DayOutcome::NoMatches,
            retries_used,
        };
        return (report, None);
    }

    let headlines = selected
        .articles
        .iter()
        .map(|a| a.title.as_str())
        .collect::<Vec<_>>()
        .join(HEADLINE_DELIMITER);
    let count = selected.articles.len();

    observer.on_event(&FetchEvent::Emitted {
        date,
        tier: selected.tier,
        headlines: count,
    });

    let row = DailyNewsRow {
        date,
        headlines,
        ticker: req.ticker.clone(),
        company: req.company.clone(),
    };
    let report = DayReport {
        date,
        outcome: DayOutcome::Emitted {
            tier: selected.tier,
            headlines: count,
        },
        retries_used,
    };
    (report, Some(row))
}

fn abandon(
    date: NaiveDate,
    reason: AbandonReason,
    retries_used: u32,
    observer: &dyn FetchObserver,
) -> (DayReport, Option<DailyNewsRow>) {
    observer.on_event(&FetchEvent::Abandoned {
        date,
        reason: reason.clone(),
    });
    let report = DayReport {
        date,
        outcome: DayOutcome::Abandoned(reason),
        retries_used,
    };
    (report, None)
}
