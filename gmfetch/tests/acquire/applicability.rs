use gmfetch::{FetchConfig, FetchOptions, GmError, Protocol};
use gmfetch_mock::MockBehavior;
use serde_json::json;

use crate::helpers::{EXCLUDES, acquirer, batch, direct_ok, event, mock, station_codes};

#[tokio::test]
async fn only_covering_connector_contributes() {
    let (a, a_ctl) = direct_ok("A");
    let (b, b_ctl) = mock("B", Protocol::EventSearch, EXCLUDES);
    b_ctl.set_retrieve_behavior(MockBehavior::Return(batch("B", "STA")));

    let report = acquirer([a, b])
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .unwrap();

    assert_eq!(station_codes(&report.streams), vec!["A.STA"]);
    assert!(report.errors.is_empty());
    assert_eq!(a_ctl.retrieve_calls(), 1);
    // B was built and then dropped by the geographic filter without any call.
    assert_eq!(b_ctl.construct_count(), 1);
    assert!(b_ctl.solve_flags().is_empty());
    assert_eq!(b_ctl.retrieve_calls(), 0);
}

#[tokio::test]
async fn construction_failure_is_reported_with_cause() {
    let (a, a_ctl) = direct_ok("A");
    a_ctl.fail_construction(GmError::InvalidConfig("bad config".into()));

    let report = acquirer([a])
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .unwrap();

    assert!(report.streams.is_empty());
    assert_eq!(
        report.error_messages(),
        vec!["Could not instantiate Fetcher A, due to error \"bad config\"".to_string()]
    );
    assert!(report.errors[0].is_recoverable());
}

#[tokio::test]
async fn construction_failure_does_not_stop_others() {
    let (a, a_ctl) = direct_ok("A");
    let (b, _b_ctl) = direct_ok("B");
    let (c, c_ctl) = direct_ok("C");
    a_ctl.fail_construction(GmError::Other("missing credentials".into()));
    c_ctl.fail_construction(GmError::InvalidConfig("no host".into()));

    let report = acquirer([c, b, a])
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .unwrap();

    assert_eq!(station_codes(&report.streams), vec!["B.STA"]);
    assert_eq!(
        report.errors,
        vec![
            GmError::construction("A", "missing credentials"),
            GmError::construction("C", "no host"),
        ]
    );
}

#[tokio::test]
async fn out_of_region_connectors_are_silent_even_when_failing() {
    let (a, a_ctl) = mock("A", Protocol::DirectQuery, EXCLUDES);
    a_ctl.set_retrieve_behavior(MockBehavior::Fail(GmError::Other("unreachable".into())));

    let report = acquirer([a])
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .unwrap();

    assert!(report.streams.is_empty());
    assert!(report.errors.is_empty());
    assert!(report.is_clean());
}

#[tokio::test]
async fn edge_of_coverage_is_outside() {
    // The event sits exactly on the northern edge.
    let (a, a_ctl) = mock(
        "A",
        Protocol::DirectQuery,
        gmfetch::BoundingBox::new(-125.0, -114.0, 32.0, 40.0),
    );
    a_ctl.set_retrieve_behavior(MockBehavior::Return(batch("A", "STA")));

    let report = acquirer([a])
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .unwrap();
    assert!(report.streams.is_empty());
    assert!(report.errors.is_empty());
}

#[tokio::test]
async fn options_reach_every_constructor() {
    let (a, a_ctl) = direct_ok("A");
    let (b, b_ctl) = mock("B", Protocol::DirectQuery, EXCLUDES);
    let dir = tempfile::tempdir().unwrap();
    let cfg = FetchConfig::default().with_fetcher("A", json!({ "user": "demo" }));
    let opts = FetchOptions::default()
        .raw_dir(dir.path())
        .drop_non_free(false)
        .config(cfg.clone());

    acquirer([a, b]).fetch_data(&event(), &opts).await.unwrap();

    for ctl in [&a_ctl, &b_ctl] {
        let seen = ctl.constructed_params();
        assert_eq!(seen.len(), 1);
        let p = &seen[0];
        assert_eq!(p.event, event());
        assert_eq!(p.raw_dir.as_deref(), Some(dir.path()));
        assert!(!p.drop_non_free);
        assert_eq!(*p.config, cfg);
    }
    let p = &a_ctl.constructed_params()[0];
    assert_eq!(p.section("A"), Some(&json!({ "user": "demo" })));
}

#[tokio::test]
async fn default_config_is_used_without_override() {
    let (a, a_ctl) = direct_ok("A");
    let default_cfg = FetchConfig::default().with_fetcher("A", json!({ "token": "x" }));
    let acquirer = crate::helpers::builder([a])
        .default_config(default_cfg.clone())
        .build()
        .unwrap();

    acquirer
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .unwrap();

    let p = &a_ctl.constructed_params()[0];
    assert_eq!(*p.config, default_cfg);
    assert!(p.raw_dir.is_none());
    assert!(p.drop_non_free);
}

#[tokio::test]
async fn empty_installation_yields_empty_report() {
    let report = acquirer([])
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .expect("no connectors is not an error");

    assert!(report.streams.is_empty());
    assert!(report.errors.is_empty());
}
