use gmfetch::{FetchOptions, GmError, Protocol, RetrievalPolicy};
use gmfetch_mock::MockBehavior;

use crate::helpers::{COVERS, acquirer, builder, direct_ok, event, mock, station_codes};

#[tokio::test]
async fn retrieval_failure_is_isolated_by_default() {
    let (a, _a_ctl) = direct_ok("A");
    let (b, b_ctl) = mock("B", Protocol::DirectQuery, COVERS);
    b_ctl.set_retrieve_behavior(MockBehavior::Fail(GmError::Other("HTTP 503".into())));
    let (c, _c_ctl) = direct_ok("C");

    let report = acquirer([a, b, c])
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .unwrap();

    assert_eq!(station_codes(&report.streams), vec!["A.STA", "C.STA"]);
    assert_eq!(report.errors, vec![GmError::retrieval("B", "HTTP 503")]);
    assert_eq!(
        report.error_messages(),
        vec!["Fetcher B failed to retrieve data, due to error \"HTTP 503\"".to_string()]
    );
}

#[tokio::test]
async fn abort_policy_fails_whole_call() {
    let (a, _a_ctl) = direct_ok("A");
    let (b, b_ctl) = mock("B", Protocol::DirectQuery, COVERS);
    b_ctl.set_retrieve_behavior(MockBehavior::Fail(GmError::Other("HTTP 503".into())));

    let err = builder([a, b])
        .retrieval_policy(RetrievalPolicy::Abort)
        .build()
        .unwrap()
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .expect_err("abort policy propagates retrieval failure");

    assert_eq!(err, GmError::retrieval("B", "HTTP 503"));
}

#[tokio::test]
async fn abort_policy_reports_first_failure_in_candidate_order() {
    let (a, a_ctl) = mock("A", Protocol::DirectQuery, COVERS);
    a_ctl.set_retrieve_behavior(MockBehavior::Fail(GmError::Other("first".into())));
    let (b, b_ctl) = mock("B", Protocol::DirectQuery, COVERS);
    b_ctl.set_retrieve_behavior(MockBehavior::Fail(GmError::Other("second".into())));

    let err = builder([b, a])
        .retrieval_policy(RetrievalPolicy::Abort)
        .build()
        .unwrap()
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.connector_name(), Some("A"));
}

#[tokio::test]
async fn abort_policy_keeps_construction_failures_recoverable() {
    let (a, a_ctl) = direct_ok("A");
    a_ctl.fail_construction(GmError::InvalidConfig("bad config".into()));
    let (b, _b_ctl) = direct_ok("B");

    let report = builder([a, b])
        .retrieval_policy(RetrievalPolicy::Abort)
        .build()
        .unwrap()
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .unwrap();

    assert_eq!(station_codes(&report.streams), vec!["B.STA"]);
    assert_eq!(report.errors, vec![GmError::construction("A", "bad config")]);
}

#[tokio::test]
async fn panicking_connector_is_isolated() {
    let (a, a_ctl) = mock("A", Protocol::DirectQuery, COVERS);
    a_ctl.set_retrieve_behavior(MockBehavior::Panic);
    let (b, _b_ctl) = direct_ok("B");

    let report = acquirer([a, b])
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .unwrap();

    assert_eq!(station_codes(&report.streams), vec!["B.STA"]);
    assert_eq!(
        report.errors,
        vec![GmError::retrieval("A", "connector task panicked")]
    );
}

#[tokio::test]
async fn construction_errors_precede_retrieval_errors() {
    let (a, a_ctl) = mock("A", Protocol::DirectQuery, COVERS);
    a_ctl.set_retrieve_behavior(MockBehavior::Fail(GmError::Other("timeout talking to A".into())));
    let (b, b_ctl) = mock("B", Protocol::EventSearch, COVERS);
    b_ctl.set_events_behavior(MockBehavior::Return(Vec::new()));
    let (z, z_ctl) = direct_ok("Z");
    z_ctl.fail_construction(GmError::Other("bad config".into()));

    let report = acquirer([z, b, a])
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .unwrap();

    let kinds: Vec<_> = report
        .errors
        .iter()
        .map(|e| (e.connector_name().map(str::to_string), e.is_recoverable()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (Some("Z".to_string()), true),
            (Some("A".to_string()), false),
            (Some("B".to_string()), true),
        ]
    );
}

#[tokio::test]
async fn connector_cannot_report_under_another_name() {
    let (a, a_ctl) = mock("A", Protocol::DirectQuery, COVERS);
    a_ctl.set_retrieve_behavior(MockBehavior::Fail(GmError::no_match("other", "anything")));
    let (b, b_ctl) = mock("B", Protocol::DirectQuery, COVERS);
    b_ctl.set_retrieve_behavior(MockBehavior::Fail(GmError::retrieval("other", "HTTP 503")));

    let report = acquirer([a, b])
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .unwrap();
    let names: Vec<_> = report.errors.iter().map(GmError::connector_name).collect();
    assert_eq!(names, vec![Some("A"), Some("B")]);
    assert!(report.errors.iter().all(GmError::is_retrieval));
    assert_eq!(report.errors[1], GmError::retrieval("B", "HTTP 503"));

    // A connector-made no-match is a retrieval failure, so the abort policy applies.
    let (a, a_ctl) = mock("A", Protocol::DirectQuery, COVERS);
    a_ctl.set_retrieve_behavior(MockBehavior::Fail(GmError::no_match("other", "anything")));
    let err = builder([a])
        .retrieval_policy(RetrievalPolicy::Abort)
        .build()
        .unwrap()
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .expect_err("abort policy propagates retrieval failure");
    assert!(matches!(err, GmError::Retrieval { .. }));
    assert_eq!(err.connector_name(), Some("A"));
}
