use gmfetch::{Acquirer, FetchOptions};
use gmfetch_demos::common::{fixture_registry, print_report, ridgecrest};
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize a human-friendly tracing subscriber with env-based filtering.
    // Suggested: RUST_LOG=debug,gmfetch=trace
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    let acquirer = Acquirer::builder()
        .registry(fixture_registry().build()?)
        .build()?;

    let report = acquirer
        .fetch_data(&ridgecrest()?, &FetchOptions::default())
        .await?;
    tracing::info!(streams = report.streams.len(), errors = report.errors.len(), "acquisition finished");
    print_report(&report);

    Ok(())
}
