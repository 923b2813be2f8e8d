//! Mock connectors for CI-safe tests and demos.
//!
//! - [`MockDirectConnector`] (`mock-direct`) and [`MockCatalogConnector`]
//!   (`mock-catalog`) are fixture connectors that self-register and serve
//!   deterministic synthetic waveforms. Their behavior is driven by their
//!   `fetchers` configuration section (see [`MockSettings`]).
//! - [`DynamicMockConnector`] is scripted at runtime through a
//!   [`DynamicMockController`] and is added to explicit registries.

use std::path::Path;

use async_trait::async_trait;
use gmfetch_core::{
    BoundingBox, CandidateEvent, Connector, ConnectorParams, ConstructConnector, DirectQuery,
    EventDescriptor, EventSearch, GmError, Protocol, WaveformBatch,
};
use gmfetch_macros::register_connector;
use serde::Deserialize;

mod dynamic;
pub mod fixtures;

pub use dynamic::{DynamicMockConnector, DynamicMockController, MockBehavior};

/// Coverage of the `mock-catalog` connector unless configured otherwise
/// (California and Nevada).
pub const CATALOG_DEFAULT_BOX: BoundingBox = BoundingBox::new(-125.0, -114.0, 32.0, 42.0);

/// Settings read from `fetchers.<name>` by the fixture connectors.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MockSettings {
    /// Network code of the synthetic stations.
    pub network: String,
    /// Free-field stations, always served.
    pub stations: Vec<String>,
    /// Borehole or structural stations, dropped when non-free-field
    /// instruments are excluded.
    pub non_free_stations: Vec<String>,
    /// Override of the connector's coverage.
    pub bounding_box: Option<BoundingBox>,
    /// When set, construction fails with this message.
    pub unavailable: Option<String>,
    /// Whether the catalog holds an event matching the request (`mock-catalog` only).
    pub catalog_match: bool,
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            network: "XX".to_string(),
            stations: vec!["STA01".to_string(), "STA02".to_string()],
            non_free_stations: vec!["BH01".to_string()],
            bounding_box: None,
            unavailable: None,
            catalog_match: true,
        }
    }
}

impl MockSettings {
    fn load(params: &ConnectorParams, name: &str) -> Result<Self, GmError> {
        let settings: Self = params.settings(name)?.unwrap_or_default();
        if let Some(msg) = &settings.unavailable {
            return Err(GmError::InvalidConfig(msg.clone()));
        }
        Ok(settings)
    }

    fn stations(&self, drop_non_free: bool) -> Vec<&str> {
        let mut out: Vec<&str> = self.stations.iter().map(String::as_str).collect();
        if !drop_non_free {
            out.extend(self.non_free_stations.iter().map(String::as_str));
        }
        out
    }
}

/// Shared state of a fixture connector instance.
#[derive(Debug)]
struct Fixture {
    name: &'static str,
    event: EventDescriptor,
    settings: MockSettings,
    bbox: BoundingBox,
    raw_dir: Option<std::path::PathBuf>,
    drop_non_free: bool,
}

impl Fixture {
    fn new(name: &'static str, default_box: BoundingBox, params: &ConnectorParams) -> Result<Self, GmError> {
        let settings = MockSettings::load(params, name)?;
        let bbox = settings.bounding_box.unwrap_or(default_box);
        Ok(Self {
            name,
            event: params.event,
            settings,
            bbox,
            raw_dir: params.raw_dir.clone(),
            drop_non_free: params.drop_non_free,
        })
    }

    async fn download(&self, origin: chrono::DateTime<chrono::Utc>) -> Result<WaveformBatch, GmError> {
        let stations = self.settings.stations(self.drop_non_free);
        if let Some(dir) = &self.raw_dir {
            write_manifest(dir, self.name, &self.settings.network, &stations).await?;
        }
        Ok(fixtures::station_batch(&self.settings.network, &stations, origin))
    }
}

/// Record what was "downloaded" as `<raw_dir>/<connector>.txt`, one `NET.STA` per line.
async fn write_manifest(
    dir: &Path,
    connector: &str,
    network: &str,
    stations: &[&str],
) -> Result<(), GmError> {
    let body: String = stations
        .iter()
        .map(|s| format!("{network}.{s}\n"))
        .collect();
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| GmError::connector(connector, format!("cannot create raw dir: {e}")))?;
    tokio::fs::write(dir.join(format!("{connector}.txt")), body)
        .await
        .map_err(|e| GmError::connector(connector, format!("cannot write raw data: {e}")))
}

/// Fixture connector serving the event window directly, with global coverage.
#[derive(Debug)]
pub struct MockDirectConnector {
    fixture: Fixture,
}

impl MockDirectConnector {
    /// Settings this instance was built with.
    #[must_use]
    pub const fn settings(&self) -> &MockSettings {
        &self.fixture.settings
    }
}

impl Connector for MockDirectConnector {
    fn name(&self) -> &str {
        self.fixture.name
    }

    fn bounding_box(&self) -> BoundingBox {
        self.fixture.bbox
    }

    fn as_direct_query(&self) -> Option<&dyn DirectQuery> {
        Some(self as &dyn DirectQuery)
    }
}

#[register_connector]
impl ConstructConnector for MockDirectConnector {
    const NAME: &'static str = "mock-direct";
    const PROTOCOL: Protocol = Protocol::DirectQuery;

    fn construct(params: &ConnectorParams) -> Result<Self, GmError> {
        Ok(Self {
            fixture: Fixture::new(Self::NAME, BoundingBox::GLOBAL, params)?,
        })
    }
}

#[async_trait]
impl DirectQuery for MockDirectConnector {
    async fn retrieve(&self) -> Result<WaveformBatch, GmError> {
        self.fixture.download(self.fixture.event.time()).await
    }
}

/// Fixture connector that resolves a catalog event before downloading.
///
/// Covers California and Nevada unless configured otherwise.
#[derive(Debug)]
pub struct MockCatalogConnector {
    fixture: Fixture,
}

impl Connector for MockCatalogConnector {
    fn name(&self) -> &str {
        self.fixture.name
    }

    fn bounding_box(&self) -> BoundingBox {
        self.fixture.bbox
    }

    fn as_event_search(&self) -> Option<&dyn EventSearch> {
        Some(self as &dyn EventSearch)
    }
}

#[register_connector]
impl ConstructConnector for MockCatalogConnector {
    const NAME: &'static str = "mock-catalog";
    const PROTOCOL: Protocol = Protocol::EventSearch;

    fn construct(params: &ConnectorParams) -> Result<Self, GmError> {
        Ok(Self {
            fixture: Fixture::new(Self::NAME, CATALOG_DEFAULT_BOX, params)?,
        })
    }
}

#[async_trait]
impl EventSearch for MockCatalogConnector {
    async fn matching_events(&self, _solve: bool) -> Result<Vec<CandidateEvent>, GmError> {
        if !self.fixture.settings.catalog_match {
            return Ok(Vec::new());
        }
        let best = fixtures::catalog_event("mock0001", &self.fixture.event);
        let mut aftershock = best.clone();
        aftershock.id = "mock0002".to_string();
        aftershock.time += chrono::Duration::minutes(5);
        aftershock.magnitude -= 1.5;
        Ok(vec![best, aftershock])
    }

    async fn retrieve_event(&self, event: &CandidateEvent) -> Result<WaveformBatch, GmError> {
        self.fixture.download(event.time).await
    }
}
