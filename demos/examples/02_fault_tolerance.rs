use std::time::Duration;

use gmfetch::{Acquirer, BoundingBox, FetchOptions, GmError, Protocol};
use gmfetch_demos::common::{fixture_registry, print_report, ridgecrest};
use gmfetch_mock::{DynamicMockConnector, MockBehavior};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A connector that cannot be configured.
    let (broken, broken_ctl) = DynamicMockConnector::new_with_controller("broken", Protocol::DirectQuery);
    broken_ctl.fail_construction(GmError::InvalidConfig("bad config".into()));

    // A catalog that never heard of the event.
    let (catalog, catalog_ctl) =
        DynamicMockConnector::new_with_controller("empty-catalog", Protocol::EventSearch);
    catalog_ctl.set_events_behavior(MockBehavior::Return(Vec::new()));

    // A provider that stalls.
    let (stalled, stalled_ctl) = DynamicMockConnector::new_with_controller("stalled", Protocol::DirectQuery);
    stalled_ctl.set_retrieve_behavior(MockBehavior::Hang);

    // A provider on the other side of the world; filtered out silently.
    let (remote, remote_ctl) = DynamicMockConnector::new_with_controller("remote", Protocol::DirectQuery);
    remote_ctl.set_bounding_box(BoundingBox::new(122.0, 154.0, 20.0, 46.0));

    let registry = fixture_registry()
        .entry(broken)
        .entry(catalog)
        .entry(stalled)
        .entry(remote)
        .build()?;

    let acquirer = Acquirer::builder()
        .registry(registry)
        .provider_timeout(Duration::from_millis(300))
        .request_timeout(Duration::from_secs(2))
        .max_concurrency(4)
        .build()?;

    let report = acquirer
        .fetch_data(&ridgecrest()?, &FetchOptions::default())
        .await?;
    print_report(&report);
    println!("remote connector was built {} time(s) and never queried", remote_ctl.construct_count());

    Ok(())
}
