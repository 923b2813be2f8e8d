use std::time::Duration;

use gmfetch::{FetchOptions, FetchReport, GmError, Protocol};
use gmfetch_mock::MockBehavior;
use proptest::prelude::*;

use crate::helpers::{COVERS, acquirer, batch, direct_slow, event, mock, station_codes};

#[tokio::test(start_paused = true)]
async fn output_order_ignores_completion_order() {
    // A finishes last, C first.
    let (a, _) = direct_slow("A", Duration::from_secs(3));
    let (b, _) = direct_slow("B", Duration::from_secs(2));
    let (c, _) = direct_slow("C", Duration::from_secs(1));

    let report = acquirer([c, a, b])
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .unwrap();

    assert_eq!(station_codes(&report.streams), vec!["A.STA", "B.STA", "C.STA"]);
}

#[tokio::test]
async fn batches_are_concatenated_whole() {
    let (a, a_ctl) = mock("A", Protocol::DirectQuery, COVERS);
    let mut two = batch("A", "S2");
    two.extend(batch("A", "S1"));
    a_ctl.set_retrieve_behavior(MockBehavior::Return(two));
    let (b, b_ctl) = mock("B", Protocol::DirectQuery, COVERS);
    b_ctl.set_retrieve_behavior(MockBehavior::Return(batch("B", "S0")));

    let report = acquirer([a, b])
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .unwrap();

    assert_eq!(station_codes(&report.streams), vec!["A.S2", "A.S1", "B.S0"]);
    assert_eq!(report.streams.traces().count(), 9);
}

#[tokio::test]
async fn repeated_calls_are_identical() {
    let (a, _) = direct_slow("A", Duration::from_millis(5));
    let (b, b_ctl) = mock("B", Protocol::EventSearch, COVERS);
    b_ctl.set_events_behavior(MockBehavior::Return(Vec::new()));
    let (c, c_ctl) = direct_slow("C", Duration::from_millis(1));
    c_ctl.fail_construction(GmError::InvalidConfig("bad config".into()));

    let acq = acquirer([a, b, c]);
    let first = acq
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .unwrap();
    let second = acq
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first.errors.len(), 2);
    assert_eq!(first.streams.len(), 1);
}

async fn run_with_delays(delays: &[u64]) -> FetchReport {
    const NAMES: [&str; 6] = ["p0", "p1", "p2", "p3", "p4", "p5"];
    let entries: Vec<_> = NAMES
        .into_iter()
        .zip(delays)
        .map(|(name, ms)| direct_slow(name, Duration::from_millis(*ms)).0)
        .collect();
    acquirer(entries)
        .fetch_data(&event(), &FetchOptions::default())
        .await
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn order_is_registry_order_for_any_latencies(delays in prop::collection::vec(0u64..50, 1..=6)) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();
        let report = rt.block_on(run_with_delays(&delays));
        let expected: Vec<String> = (0..delays.len()).map(|i| format!("p{i}.STA")).collect();
        prop_assert_eq!(station_codes(&report.streams), expected);
        prop_assert!(report.errors.is_empty());
    }
}
