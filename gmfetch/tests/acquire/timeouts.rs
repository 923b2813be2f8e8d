use std::time::Duration;

use gmfetch::{FetchOptions, GmError, Protocol};
use gmfetch_mock::MockBehavior;

use crate::helpers::{COVERS, builder, direct_ok, direct_slow, event, mock, station_codes};

#[tokio::test(start_paused = true)]
async fn provider_timeout_is_per_connector() {
    let (a, a_ctl) = mock("A", Protocol::DirectQuery, COVERS);
    a_ctl.set_retrieve_behavior(MockBehavior::Hang);
    let (b, _b_ctl) = direct_slow("B", Duration::from_secs(1));

    let report = builder([a, b])
        .provider_timeout(Duration::from_secs(5))
        .build()
        .unwrap()
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .unwrap();

    assert_eq!(station_codes(&report.streams), vec!["B.STA"]);
    assert_eq!(report.errors, vec![GmError::provider_timeout("A", "retrieve")]);
    assert!(report.errors[0].is_retrieval());
}

#[tokio::test(start_paused = true)]
async fn provider_timeout_covers_event_search() {
    let (a, a_ctl) = mock("A", Protocol::EventSearch, COVERS);
    a_ctl.set_events_behavior(MockBehavior::Hang);

    let report = builder([a])
        .provider_timeout(Duration::from_secs(5))
        .build()
        .unwrap()
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .unwrap();

    assert!(report.streams.is_empty());
    assert_eq!(report.errors, vec![GmError::provider_timeout("A", "retrieve")]);
}

#[tokio::test(start_paused = true)]
async fn request_deadline_records_unfinished_candidates() {
    let (a, _a_ctl) = direct_slow("A", Duration::from_secs(1));
    let (b, b_ctl) = mock("B", Protocol::DirectQuery, COVERS);
    b_ctl.set_retrieve_behavior(MockBehavior::Hang);
    let (c, _c_ctl) = direct_slow("C", Duration::from_secs(2));

    let started = tokio::time::Instant::now();
    let report = builder([a, b, c])
        .request_timeout(Duration::from_secs(10))
        .build()
        .unwrap()
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .expect("deadline is never fatal");

    assert!(started.elapsed() < Duration::from_secs(60));
    assert_eq!(station_codes(&report.streams), vec!["A.STA", "C.STA"]);
    assert_eq!(
        report.error_messages(),
        vec![
            "Fetcher B failed to retrieve data, due to error \"acquisition deadline exceeded\""
                .to_string()
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn retrieval_runs_concurrently() {
    let entries: Vec<_> = ["A", "B", "C"]
        .into_iter()
        .map(|n| direct_slow(n, Duration::from_secs(2)).0)
        .collect();

    let started = tokio::time::Instant::now();
    let report = builder(entries)
        .build()
        .unwrap()
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .unwrap();

    assert_eq!(report.streams.len(), 3);
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test(start_paused = true)]
async fn max_concurrency_serializes_retrieval() {
    let entries: Vec<_> = ["A", "B", "C"]
        .into_iter()
        .map(|n| direct_slow(n, Duration::from_secs(2)).0)
        .collect();

    let started = tokio::time::Instant::now();
    let report = builder(entries)
        .max_concurrency(1)
        .provider_timeout(Duration::from_secs(3))
        .build()
        .unwrap()
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .unwrap();

    // Queueing for a slot does not eat into the provider timeout.
    assert!(report.errors.is_empty());
    assert_eq!(station_codes(&report.streams), vec!["A.STA", "B.STA", "C.STA"]);
    assert!(started.elapsed() >= Duration::from_secs(6));
}

#[tokio::test]
async fn zero_limits_are_rejected() {
    let (a, _) = direct_ok("A");
    let err = builder([a]).max_concurrency(0).build().err().unwrap();
    assert!(matches!(err, GmError::InvalidArg(_)));
}

#[tokio::test(start_paused = true)]
async fn dropping_the_call_cancels_connector_work() {
    let (a, a_ctl) = direct_slow("A", Duration::from_secs(5));
    let acq = builder([a]).build().unwrap();

    let event = event();
    let options = FetchOptions::default();
    let outcome =
        tokio::time::timeout(Duration::from_secs(1), acq.fetch_data(&event, &options)).await;
    assert!(outcome.is_err(), "caller gave up before the connector answered");

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(a_ctl.retrieve_calls(), 1);
    assert_eq!(a_ctl.settled_calls(), 0);
}
