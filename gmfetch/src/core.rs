use std::sync::Arc;
use std::time::Duration;

use gmfetch_core::{
    AcquirerConfig, ConnectorRegistry, FetchConfig, GmError, RetrievalPolicy, load_default_config,
};

/// Orchestrator that acquires event waveforms across registered connectors.
pub struct Acquirer {
    pub(crate) registry: Arc<ConnectorRegistry>,
    pub(crate) cfg: AcquirerConfig,
    pub(crate) default_config: Arc<FetchConfig>,
}

/// Builder for constructing an [`Acquirer`] with custom configuration.
pub struct AcquirerBuilder {
    registry: Option<ConnectorRegistry>,
    cfg: AcquirerConfig,
    default_config: Option<FetchConfig>,
}

impl Default for AcquirerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AcquirerBuilder {
    /// Create a new builder with sensible defaults.
    ///
    /// Behavior and trade-offs:
    /// - Without an explicit [`registry`](Self::registry) the process-wide
    ///   registry of link-time registrations is used.
    /// - Without an explicit [`default_config`](Self::default_config) the
    ///   configuration is read from `GMFETCH_CONFIG` at build time.
    /// - Defaults: 60s per-connector timeout, no overall deadline, unbounded
    ///   concurrency, retrieval failures isolated per connector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: None,
            cfg: AcquirerConfig::default(),
            default_config: None,
        }
    }

    /// Use an explicit connector registry instead of the global one.
    #[must_use]
    pub fn registry(mut self, registry: ConnectorRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set the per-connector retrieval timeout.
    ///
    /// Behavior and trade-offs:
    /// - Covers the event search and the download of one connector.
    /// - Expiry is recorded as a `ProviderTimeout` for that connector.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Set an overall deadline for the retrieval phase.
    ///
    /// Behavior and trade-offs:
    /// - Bounds total latency when several connectors stall.
    /// - Connectors still running at the deadline are aborted and reported
    ///   individually; results already retrieved are kept.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Cap the number of connectors retrieving at once.
    ///
    /// Output order does not depend on this setting.
    #[must_use]
    pub const fn max_concurrency(mut self, limit: usize) -> Self {
        self.cfg.max_concurrency = Some(limit);
        self
    }

    /// Select how retrieval failures are handled.
    ///
    /// Behavior and trade-offs:
    /// - `Isolate`: the failure becomes an error entry for that connector and
    ///   every other connector's data is still returned.
    /// - `Abort`: the first failure in candidate order fails the whole call.
    #[must_use]
    pub const fn retrieval_policy(mut self, policy: RetrievalPolicy) -> Self {
        self.cfg.retrieval_policy = policy;
        self
    }

    /// Configuration used for calls that do not supply their own.
    #[must_use]
    pub fn default_config(mut self, cfg: FetchConfig) -> Self {
        self.default_config = Some(cfg);
        self
    }

    /// Replace all orchestrator settings at once.
    #[must_use]
    pub const fn config(mut self, cfg: AcquirerConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Build the [`Acquirer`].
    ///
    /// # Errors
    /// Returns `Discovery` if the global registry is used and cannot be built,
    /// `InvalidConfig` if the default configuration cannot be loaded, and
    /// `InvalidArg` for a zero timeout or a zero concurrency limit.
    pub fn build(self) -> Result<Acquirer, GmError> {
        if self.cfg.provider_timeout.is_zero() {
            return Err(GmError::InvalidArg(
                "provider timeout must be greater than zero".to_string(),
            ));
        }
        if self.cfg.max_concurrency == Some(0) {
            return Err(GmError::InvalidArg(
                "max concurrency must be at least 1".to_string(),
            ));
        }
        let registry = match self.registry {
            Some(r) => r,
            None => ConnectorRegistry::global()?.clone(),
        };
        let default_config = match self.default_config {
            Some(c) => c,
            None => load_default_config()?,
        };
        Ok(Acquirer {
            registry: Arc::new(registry),
            cfg: self.cfg,
            default_config: Arc::new(default_config),
        })
    }
}

impl Acquirer {
    /// Start building a new `Acquirer`.
    ///
    /// ```rust,ignore
    /// let acquirer = gmfetch::Acquirer::builder()
    ///     .provider_timeout(std::time::Duration::from_secs(30))
    ///     .request_timeout(std::time::Duration::from_secs(120))
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> AcquirerBuilder {
        AcquirerBuilder::new()
    }

    /// Registry this acquirer draws connectors from.
    #[must_use]
    pub fn registry(&self) -> &ConnectorRegistry {
        &self.registry
    }

    /// Orchestrator settings.
    #[must_use]
    pub const fn settings(&self) -> &AcquirerConfig {
        &self.cfg
    }

    /// Wrap a connector future with a timeout and standardized timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "gmfetch::core::provider_call_with_timeout",
            skip(fut),
            fields(
                connector = connector_name,
                capability = capability,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        connector_name: &str,
        capability: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, GmError>
    where
        Fut: core::future::Future<Output = Result<T, GmError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(GmError::provider_timeout(connector_name, capability)))
    }
}

/// Attribute a connector error to the retrieval phase of `connector`.
///
/// Retrieval and provider-timeout errors already naming `connector` pass
/// through unchanged. Everything else is rewrapped under `connector`; a
/// `NoMatch` is only ever raised by dispatch itself.
pub(crate) fn tag_err(connector: &str, e: GmError) -> GmError {
    match e {
        e @ (GmError::Retrieval { .. } | GmError::ProviderTimeout { .. })
            if e.connector_name() == Some(connector) =>
        {
            e
        }
        other => GmError::retrieval(connector, other.detail()),
    }
}
