use chrono::NaiveDate;
use std::sync::Arc;
use std::time::{Duration, Instant};
use stock_gdelt::news::decode::Undecodable;
use stock_gdelt::news::{
    AbandonReason, ContentFault, DayOutcome, FetchEvent, NewsSource, Tier, TransientFault,
};
use stock_gdelt::{NewsBuilder, RetryConfig, SgError};

use crate::common::{RecordingObserver, Scripted, ScriptedSource, article, gdelt_body};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn relevant_body() -> String {
    gdelt_body(vec![article("Acme earnings beat estimates", Some("English"))])
}

fn builder(source: &Arc<ScriptedSource>, observer: &Arc<RecordingObserver>) -> NewsBuilder {
    let source: Arc<dyn NewsSource> = source.clone();
    NewsBuilder::from_source(source, "ACME", "Acme Corp")
        .keywords(["ACME", "Acme"])
        .retry_policy(RetryConfig::immediate(3))
        .observer(observer.clone())
}

#[tokio::test]
async fn four_rate_limits_abandon_the_day_after_three_retries() {
    let source = Arc::new(ScriptedSource::new(vec![], Scripted::rate_limited()));
    let observer = Arc::new(RecordingObserver::default());

    let report = builder(&source, &observer)
        .between(d(2024, 1, 2), d(2024, 1, 2))
        .fetch_report()
        .await
        .unwrap();

    assert_eq!(source.calls(), 4);
    assert!(report.rows.is_empty());
    assert_eq!(report.days.len(), 1);
    assert_eq!(report.days[0].retries_used, 3);
    assert_eq!(
        report.days[0].outcome,
        DayOutcome::Abandoned(AbandonReason::RetriesExhausted(TransientFault::RateLimited))
    );

    let left: Vec<u32> = observer
        .retries()
        .into_iter()
        .map(|e| match e {
            FetchEvent::RetryScheduled { retries_left, .. } => retries_left,
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(left, vec![2, 1, 0]);
}

#[tokio::test]
async fn network_fault_then_success_emits_the_row() {
    let source = Arc::new(ScriptedSource::new(
        vec![Scripted::fault("connection reset")],
        Scripted::ok(relevant_body()),
    ));
    let observer = Arc::new(RecordingObserver::default());

    let report = builder(&source, &observer)
        .between(d(2024, 1, 2), d(2024, 1, 2))
        .fetch_report()
        .await
        .unwrap();

    assert_eq!(source.calls(), 2);
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].headlines, "Acme earnings beat estimates");
    assert_eq!(report.days[0].retries_used, 1);
    assert_eq!(
        report.days[0].outcome,
        DayOutcome::Emitted {
            tier: Tier::Primary,
            headlines: 1
        }
    );

    let retries = observer.retries();
    assert_eq!(retries.len(), 1);
    match &retries[0] {
        FetchEvent::RetryScheduled {
            fault,
            retries_left,
            ..
        } => {
            assert!(matches!(fault, TransientFault::Network(msg) if msg.contains("connection reset")));
            assert_eq!(*retries_left, 2);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn content_faults_are_not_retried() {
    let cases = [
        (
            "<html>502 Bad Gateway</html>",
            ContentFault::Undecodable(Undecodable::NonJson),
        ),
        (
            r#"{"articles": [{"title": }"#,
            ContentFault::Undecodable(Undecodable::Unrecoverable),
        ),
        ("{}", ContentFault::MissingArticles),
        (r#"{"articles": "none"}"#, ContentFault::MissingArticles),
    ];

    for (body, expected) in cases {
        let source = Arc::new(ScriptedSource::new(vec![], Scripted::ok(body)));
        let observer = Arc::new(RecordingObserver::default());

        let report = builder(&source, &observer)
            .between(d(2024, 1, 2), d(2024, 1, 2))
            .fetch_report()
            .await
            .unwrap();

        assert_eq!(source.calls(), 1, "{body}");
        assert!(observer.retries().is_empty(), "{body}");
        assert_eq!(report.days[0].retries_used, 0, "{body}");
        assert_eq!(
            report.days[0].outcome,
            DayOutcome::Abandoned(AbandonReason::Content(expected)),
            "{body}"
        );
    }
}

#[tokio::test]
async fn status_429_is_retried_like_the_notice() {
    let source = Arc::new(ScriptedSource::new(
        vec![Scripted::Body(429, String::new())],
        Scripted::ok(relevant_body()),
    ));
    let observer = Arc::new(RecordingObserver::default());

    let report = builder(&source, &observer)
        .between(d(2024, 1, 2), d(2024, 1, 2))
        .fetch_report()
        .await
        .unwrap();

    assert_eq!(source.calls(), 2);
    assert_eq!(report.rows.len(), 1);
    assert!(matches!(
        observer.retries()[0],
        FetchEvent::RetryScheduled {
            fault: TransientFault::RateLimited,
            ..
        }
    ));
}

#[tokio::test]
async fn custom_rate_limit_marker_is_honoured() {
    let source = Arc::new(ScriptedSource::new(
        vec![Scripted::ok("Too many requests, back off")],
        Scripted::ok(relevant_body()),
    ));
    let observer = Arc::new(RecordingObserver::default());

    let report = builder(&source, &observer)
        .rate_limit_marker("back off")
        .between(d(2024, 1, 2), d(2024, 1, 2))
        .fetch_report()
        .await
        .unwrap();

    assert_eq!(source.calls(), 2);
    assert_eq!(report.rows.len(), 1);
    assert_eq!(observer.retries().len(), 1);
}

#[tokio::test]
async fn zero_retry_budget_abandons_on_first_transient_fault() {
    let source = Arc::new(ScriptedSource::new(vec![], Scripted::fault("timeout")));
    let observer = Arc::new(RecordingObserver::default());

    let report = builder(&source, &observer)
        .retry_policy(RetryConfig::immediate(0))
        .between(d(2024, 1, 2), d(2024, 1, 2))
        .fetch_report()
        .await
        .unwrap();

    assert_eq!(source.calls(), 1);
    assert!(observer.retries().is_empty());
    assert!(matches!(
        report.days[0].outcome,
        DayOutcome::Abandoned(AbandonReason::RetriesExhausted(TransientFault::Network(_)))
    ));
}

#[tokio::test]
async fn retry_budget_resets_every_day() {
    let body = relevant_body();
    let source = Arc::new(ScriptedSource::new(
        vec![
            Scripted::rate_limited(),
            Scripted::rate_limited(),
            Scripted::rate_limited(),
            Scripted::ok(body.clone()),
            Scripted::rate_limited(),
            Scripted::ok(body.clone()),
        ],
        Scripted::ok(body),
    ));
    let observer = Arc::new(RecordingObserver::default());

    let report = builder(&source, &observer)
        .between(d(2024, 1, 2), d(2024, 1, 3))
        .fetch_report()
        .await
        .unwrap();

    assert_eq!(source.calls(), 6);
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.days[0].retries_used, 3);
    assert_eq!(report.days[1].retries_used, 1);
    assert_eq!(report.abandoned_days(), 0);
}

#[tokio::test]
async fn an_abandoned_day_does_not_stop_the_range() {
    let source = Arc::new(ScriptedSource::new(
        vec![Scripted::ok("{}")],
        Scripted::ok(relevant_body()),
    ));
    let observer = Arc::new(RecordingObserver::default());

    let report = builder(&source, &observer)
        .between(d(2024, 1, 2), d(2024, 1, 4))
        .fetch_report()
        .await
        .unwrap();

    assert_eq!(report.days.len(), 3);
    assert_eq!(report.abandoned_days(), 1);
    let dates: Vec<NaiveDate> = report.rows.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![d(2024, 1, 3), d(2024, 1, 4)]);
}

#[tokio::test]
async fn windows_are_consecutive_whole_days() {
    let source = Arc::new(ScriptedSource::new(vec![], Scripted::ok(relevant_body())));
    let observer = Arc::new(RecordingObserver::default());

    // spans the month boundary
    builder(&source, &observer)
        .between(d(2024, 1, 30), d(2024, 2, 2))
        .fetch()
        .await
        .unwrap();

    let queries = source.queries();
    assert_eq!(queries.len(), 4);
    assert_eq!(queries[0].start, d(2024, 1, 30).and_hms_opt(0, 0, 0).unwrap());
    assert_eq!(queries[3].end, d(2024, 2, 3).and_hms_opt(0, 0, 0).unwrap());
    for pair in queries.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
    for q in &queries {
        assert_eq!(q.end - q.start, chrono::Duration::days(1));
        assert_eq!(q.query, "Acme Corp");
        assert_eq!(q.max_records, 250);
    }
}

#[tokio::test]
async fn events_follow_the_day_lifecycle() {
    let source = Arc::new(ScriptedSource::new(
        vec![Scripted::rate_limited()],
        Scripted::ok(relevant_body()),
    ));
    let observer = Arc::new(RecordingObserver::default());

    builder(&source, &observer)
        .between(d(2024, 1, 2), d(2024, 1, 2))
        .fetch()
        .await
        .unwrap();

    let date = d(2024, 1, 2);
    assert_eq!(
        observer.events(),
        vec![
            FetchEvent::RangeStarted {
                company: "Acme Corp".into(),
                start: date,
                end: date,
            },
            FetchEvent::Requesting { date, attempt: 1 },
            FetchEvent::RetryScheduled {
                date,
                fault: TransientFault::RateLimited,
                retries_left: 2,
                backoff: Duration::ZERO,
            },
            FetchEvent::Requesting { date, attempt: 2 },
            FetchEvent::Decoded { date, articles: 1 },
            FetchEvent::Emitted {
                date,
                tier: Tier::Primary,
                headlines: 1,
            },
            FetchEvent::RangeFinished { days: 1, rows: 1 },
        ]
    );
}

#[tokio::test]
async fn delays_are_applied_between_days_and_before_retries() {
    let source = Arc::new(ScriptedSource::new(
        vec![Scripted::rate_limited()],
        Scripted::ok(relevant_body()),
    ));
    let observer = Arc::new(RecordingObserver::default());
    let policy = RetryConfig {
        max_retries: 3,
        backoff: Duration::from_millis(40),
        inter_request_delay: Duration::from_millis(30),
    };

    let started = Instant::now();
    let report = builder(&source, &observer)
        .retry_policy(policy)
        .between(d(2024, 1, 2), d(2024, 1, 4))
        .fetch_report()
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(report.rows.len(), 3);
    // one backoff plus two gaps between three days
    assert!(elapsed >= Duration::from_millis(100), "elapsed {elapsed:?}");
}

#[tokio::test]
async fn empty_second_day_yields_only_the_first_row() {
    let source = Arc::new(ScriptedSource::new(
        vec![Scripted::ok(gdelt_body(vec![article(
            "Acme earnings surge",
            Some("English"),
        )]))],
        Scripted::ok(gdelt_body(vec![])),
    ));
    let observer = Arc::new(RecordingObserver::default());

    let report = builder(&source, &observer)
        .between(d(2024, 1, 2), d(2024, 1, 3))
        .fetch_report()
        .await
        .unwrap();

    assert_eq!(source.calls(), 2);
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].date, d(2024, 1, 2));
    assert_eq!(report.rows[0].headlines, "Acme earnings surge");
    assert_eq!(
        report.days[0].outcome,
        DayOutcome::Emitted {
            tier: Tier::Primary,
            headlines: 1
        }
    );
    assert_eq!(report.days[1].date, d(2024, 1, 3));
    assert_eq!(report.days[1].outcome, DayOutcome::NoMatches);
}

#[tokio::test]
async fn inter_day_delay_applies_when_days_yield_nothing() {
    let source = Arc::new(ScriptedSource::new(
        vec![Scripted::ok("{}")],
        Scripted::ok(gdelt_body(vec![])),
    ));
    let observer = Arc::new(RecordingObserver::default());
    let delay = Duration::from_millis(50);
    let policy = RetryConfig {
        max_retries: 3,
        backoff: Duration::ZERO,
        inter_request_delay: delay,
    };

    let started = Instant::now();
    let report = builder(&source, &observer)
        .retry_policy(policy)
        .between(d(2024, 1, 2), d(2024, 1, 4))
        .fetch_report()
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert!(report.rows.is_empty());
    assert_eq!(report.abandoned_days(), 1);
    assert_eq!(report.days[1].outcome, DayOutcome::NoMatches);
    assert_eq!(report.days[2].outcome, DayOutcome::NoMatches);
    // two gaps between three days, none after the last
    assert!(elapsed >= delay * 2, "elapsed {elapsed:?}");
}

#[tokio::test]
async fn invalid_configuration_is_an_error() {
    let source = Arc::new(ScriptedSource::new(vec![], Scripted::ok(relevant_body())));
    let observer = Arc::new(RecordingObserver::default());

    let err = builder(&source, &observer).fetch().await.unwrap_err();
    assert!(matches!(err, SgError::Data(_)), "{err}");

    let err = builder(&source, &observer)
        .between(d(2024, 1, 3), d(2024, 1, 2))
        .fetch()
        .await
        .unwrap_err();
    assert!(matches!(err, SgError::InvalidDates), "{err}");

    let source_dyn: Arc<dyn NewsSource> = source.clone();
    let err = NewsBuilder::from_source(source_dyn, "&", "!!!")
        .between(d(2024, 1, 2), d(2024, 1, 2))
        .fetch()
        .await
        .unwrap_err();
    assert!(matches!(err, SgError::Data(_)), "{err}");

    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn query_falls_back_to_the_ticker() {
    let source = Arc::new(ScriptedSource::new(vec![], Scripted::ok(relevant_body())));
    let source_dyn: Arc<dyn NewsSource> = source.clone();

    NewsBuilder::from_source(source_dyn, "ACME", "...")
        .retry_policy(RetryConfig::immediate(0))
        .between(d(2024, 1, 2), d(2024, 1, 2))
        .fetch()
        .await
        .unwrap();

    assert_eq!(source.queries()[0].query, "ACME");
}
