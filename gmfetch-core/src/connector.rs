use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::{BoundingBox, CandidateEvent, EventDescriptor, FetchConfig, GmError, Protocol, WaveformBatch};

/// Focused role trait for connectors that fetch the event window directly.
#[async_trait]
pub trait DirectQuery: Send + Sync {
    /// Download waveforms for the event this connector was constructed with.
    ///
    /// An empty batch is a legal, non-error outcome.
    async fn retrieve(&self) -> Result<WaveformBatch, GmError>;
}

/// Focused role trait for connectors that must resolve a catalog event first.
#[async_trait]
pub trait EventSearch: Send + Sync {
    /// Catalog events matching the constructed event, best match first.
    ///
    /// With `solve` set the connector applies its own ranking so that the
    /// first element is the one to download. An empty vector means no match.
    async fn matching_events(&self, solve: bool) -> Result<Vec<CandidateEvent>, GmError>;

    /// Download waveforms recorded for a matched catalog event.
    async fn retrieve_event(&self, event: &CandidateEvent) -> Result<WaveformBatch, GmError>;
}

/// A provider-specific data source plugin.
///
/// Instances are built per acquisition from [`ConnectorParams`] and dropped at
/// its end. The bounding box is static per provider and independent of the event.
pub trait Connector: Send + Sync {
    /// Stable identifier, normally the registered name.
    fn name(&self) -> &str;

    /// Geographic coverage of the provider.
    fn bounding_box(&self) -> BoundingBox;

    /// Returns this connector as a direct-query retriever, if supported.
    fn as_direct_query(&self) -> Option<&dyn DirectQuery> {
        None
    }

    /// Returns this connector as an event-search retriever, if supported.
    fn as_event_search(&self) -> Option<&dyn EventSearch> {
        None
    }
}

/// Connector types that can be registered by type.
///
/// `construct` must not perform network I/O. It may validate configuration
/// and should fail fast when required settings are missing.
pub trait ConstructConnector: Connector + Sized + 'static {
    /// Registered, unique connector name.
    const NAME: &'static str;
    /// Retrieval protocol used to dispatch this connector.
    const PROTOCOL: Protocol;

    /// Build an instance for one acquisition.
    ///
    /// # Errors
    /// Returns an error when the connector cannot serve this request, typically
    /// because of missing or invalid configuration.
    fn construct(params: &ConnectorParams) -> Result<Self, GmError>;
}

/// Inputs handed to every connector constructor.
#[derive(Debug, Clone)]
pub struct ConnectorParams {
    /// Event being acquired.
    pub event: EventDescriptor,
    /// Optional directory for downloaded artifacts. When `None` the connector
    /// owns transient storage and discards it.
    pub raw_dir: Option<PathBuf>,
    /// Full configuration; connectors read their own `fetchers` section.
    pub config: Arc<FetchConfig>,
    /// Drop non-free-field instruments (boreholes, sensors on structures).
    pub drop_non_free: bool,
}

impl ConnectorParams {
    /// Parameters with default options for an event.
    #[must_use]
    pub fn new(event: EventDescriptor) -> Self {
        Self {
            event,
            raw_dir: None,
            config: Arc::new(FetchConfig::default()),
            drop_non_free: true,
        }
    }

    /// Raw configuration section for the named connector.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&serde_json::Value> {
        self.config.fetcher_section(name)
    }

    /// Typed configuration section for the named connector.
    ///
    /// # Errors
    /// Returns `InvalidConfig` when the section does not match `T`.
    pub fn settings<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, GmError> {
        self.config.fetcher_settings(name)
    }
}
