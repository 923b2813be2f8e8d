use gmfetch::FetchOptions;
use gmfetch_demos::common::{print_report, ridgecrest};

// Link the self-registering fixture connectors into this binary.
extern crate gmfetch_mock as _;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Describe the event.
    let event = ridgecrest()?;
    println!("Acquiring waveforms for {event}...");

    // 2. Acquire from every self-registered connector covering the epicenter.
    let report = gmfetch::fetch_data(&event, &FetchOptions::default()).await?;

    // 3. Waveforms and per-connector errors arrive together.
    print_report(&report);

    Ok(())
}
