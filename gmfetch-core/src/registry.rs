//! Connector registry.
//!
//! Connector types register themselves at link time through `inventory`
//! (usually via `#[register_connector]`); [`ConnectorRegistry::discover`]
//! collects every registration into a name-keyed, name-ordered map. Entries
//! can also be added explicitly through [`RegistryBuilder`], which is how
//! tests and embedding applications assemble closed sets of connectors.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::connector::{ConnectorParams, ConstructConnector};
use crate::{Connector, GmError, Protocol};

/// Type-erased constructor stored in link-time registrations.
pub type ConstructFn = fn(&ConnectorParams) -> Result<Arc<dyn Connector>, GmError>;

/// Constructor stored in registry entries; may capture state.
pub type ConnectorFactory =
    Arc<dyn Fn(&ConnectorParams) -> Result<Arc<dyn Connector>, GmError> + Send + Sync>;

/// Link-time registration of a connector type.
pub struct ConnectorRegistration {
    /// Registered name.
    pub name: &'static str,
    /// Declared retrieval protocol.
    pub protocol: Protocol,
    /// Constructor.
    pub construct: ConstructFn,
}

impl ConnectorRegistration {
    /// Registration for a connector type.
    #[must_use]
    pub const fn of<C: ConstructConnector>() -> Self {
        Self {
            name: C::NAME,
            protocol: C::PROTOCOL,
            construct: construct_erased::<C>,
        }
    }
}

fn construct_erased<C: ConstructConnector>(
    params: &ConnectorParams,
) -> Result<Arc<dyn Connector>, GmError> {
    Ok(Arc::new(C::construct(params)?))
}

inventory::collect!(ConnectorRegistration);

/// A named connector constructor with its protocol tag.
#[derive(Clone)]
pub struct ConnectorEntry {
    name: String,
    protocol: Protocol,
    factory: ConnectorFactory,
}

impl ConnectorEntry {
    /// Entry backed by an arbitrary constructor closure.
    pub fn new<F>(name: impl Into<String>, protocol: Protocol, factory: F) -> Self
    where
        F: Fn(&ConnectorParams) -> Result<Arc<dyn Connector>, GmError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            protocol,
            factory: Arc::new(factory),
        }
    }

    /// Entry for a connector type.
    #[must_use]
    pub fn of<C: ConstructConnector>() -> Self {
        Self::from_registration(&ConnectorRegistration::of::<C>())
    }

    /// Entry for a link-time registration.
    #[must_use]
    pub fn from_registration(reg: &ConnectorRegistration) -> Self {
        let construct = reg.construct;
        Self {
            name: reg.name.to_string(),
            protocol: reg.protocol,
            factory: Arc::new(construct),
        }
    }

    /// Registered name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared retrieval protocol.
    #[must_use]
    pub const fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Instantiate the connector.
    ///
    /// # Errors
    /// Propagates the constructor's error unchanged.
    pub fn construct(&self, params: &ConnectorParams) -> Result<Arc<dyn Connector>, GmError> {
        (self.factory)(params)
    }
}

impl fmt::Debug for ConnectorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorEntry")
            .field("name", &self.name)
            .field("protocol", &self.protocol)
            .finish_non_exhaustive()
    }
}

/// True for names reserved for internal helper connectors, which are never
/// offered for acquisition: a leading underscore or a double underscore.
#[must_use]
pub fn is_internal_name(name: &str) -> bool {
    name.starts_with('_') || name.contains("__")
}

/// Name-keyed set of connectors available for acquisition.
///
/// Iteration follows name order, so two registries built from the same
/// registrations iterate identically.
#[derive(Debug, Clone)]
pub struct ConnectorRegistry {
    entries: BTreeMap<String, ConnectorEntry>,
}

impl ConnectorRegistry {
    /// Start an explicit registry.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Collect every link-time registration.
    ///
    /// An installation without connectors yields an empty registry.
    ///
    /// # Errors
    /// Returns `Discovery` when a name is empty or two registrations share a name.
    pub fn discover() -> Result<Self, GmError> {
        Self::builder().with_discovered().build()
    }

    /// Process-wide registry, discovered once on first use and read-only afterwards.
    ///
    /// # Errors
    /// Returns the discovery error, identically on every call, if discovery failed.
    pub fn global() -> Result<&'static Self, GmError> {
        static GLOBAL: OnceLock<Result<ConnectorRegistry, GmError>> = OnceLock::new();
        GLOBAL.get_or_init(Self::discover).as_ref().map_err(Clone::clone)
    }

    /// Number of connectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the registry holds no connector.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names in iteration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Look up a connector by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ConnectorEntry> {
        self.entries.get(name)
    }

    /// Iterate entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ConnectorEntry> {
        self.entries.values()
    }
}

/// Builder for [`ConnectorRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    pending: Vec<ConnectorEntry>,
}

impl RegistryBuilder {
    /// Empty builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Register a connector type.
    #[must_use]
    pub fn register<C: ConstructConnector>(self) -> Self {
        self.entry(ConnectorEntry::of::<C>())
    }

    /// Register an entry.
    #[must_use]
    pub fn entry(mut self, entry: ConnectorEntry) -> Self {
        self.pending.push(entry);
        self
    }

    /// Add every link-time registration.
    #[must_use]
    pub fn with_discovered(mut self) -> Self {
        for reg in inventory::iter::<ConnectorRegistration> {
            self.pending.push(ConnectorEntry::from_registration(reg));
        }
        self
    }

    /// Validate and freeze the registry.
    ///
    /// Internal helper names (see [`is_internal_name`]) are skipped.
    ///
    /// # Errors
    /// Returns `Discovery` when a name is empty or registered twice.
    pub fn build(self) -> Result<ConnectorRegistry, GmError> {
        let mut entries: BTreeMap<String, ConnectorEntry> = BTreeMap::new();
        for entry in self.pending {
            if entry.name.trim().is_empty() {
                return Err(GmError::discovery("connector registered with an empty name"));
            }
            if is_internal_name(&entry.name) {
                #[cfg(feature = "tracing")]
                tracing::debug!(connector = %entry.name, "skipping internal connector registration");
                continue;
            }
            if entries.contains_key(&entry.name) {
                return Err(GmError::discovery(format!(
                    "connector name `{}` registered more than once",
                    entry.name
                )));
            }
            entries.insert(entry.name.clone(), entry);
        }
        #[cfg(feature = "tracing")]
        tracing::info!(connectors = entries.len(), "connector registry ready");
        Ok(ConnectorRegistry { entries })
    }
}
