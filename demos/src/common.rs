use chrono::{TimeZone, Utc};
use gmfetch::{ConnectorRegistry, EventDescriptor, FetchReport, GmError, RegistryBuilder};
use gmfetch_mock::{MockCatalogConnector, MockDirectConnector};

/// 2019 Ridgecrest mainshock, inside the coverage of both fixture connectors.
///
/// # Errors
/// Never in practice; the coordinates are valid.
pub fn ridgecrest() -> Result<EventDescriptor, GmError> {
    let origin = Utc
        .with_ymd_and_hms(2019, 7, 6, 3, 19, 53)
        .single()
        .ok_or_else(|| GmError::InvalidArg("ambiguous origin time".into()))?;
    EventDescriptor::new(origin, 35.770, -117.599, 8.0, 7.1)
}

/// Registry builder preloaded with the fixture connectors.
#[must_use]
pub fn fixture_registry() -> RegistryBuilder {
    ConnectorRegistry::builder()
        .register::<MockDirectConnector>()
        .register::<MockCatalogConnector>()
}

/// Print one line per stream and one line per error.
pub fn print_report(report: &FetchReport) {
    println!("streams: {}", report.streams.len());
    for stream in &report.streams {
        let channels: Vec<String> = stream.traces.iter().map(|t| t.id.channel.clone()).collect();
        println!(
            "  {} [{}]",
            stream.station_code().unwrap_or_default(),
            channels.join(",")
        );
    }
    println!("errors: {}", report.errors.len());
    for msg in report.error_messages() {
        println!("  {msg}");
    }
}
