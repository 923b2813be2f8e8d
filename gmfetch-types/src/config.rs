//! Configuration types shared across the orchestrator and connectors.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::GmError;

/// What the orchestrator does when a matched connector fails during retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum RetrievalPolicy {
    /// Record the failure against that connector and keep the other results.
    #[default]
    Isolate,
    /// Fail the whole acquisition with the first failure in candidate order.
    Abort,
}

/// Settings of the acquisition orchestrator itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquirerConfig {
    /// Bound on a single connector's retrieval phase (event search plus download).
    pub provider_timeout: Duration,
    /// Optional bound on the whole retrieval phase across all connectors.
    /// Connectors still running when it elapses are reported individually.
    pub request_timeout: Option<Duration>,
    /// Optional cap on connectors retrieving at the same time.
    pub max_concurrency: Option<usize>,
    /// Handling of retrieval failures.
    pub retrieval_policy: RetrievalPolicy,
}

impl Default for AcquirerConfig {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(60),
            request_timeout: None,
            max_concurrency: None,
            retrieval_policy: RetrievalPolicy::default(),
        }
    }
}

/// Configuration handed to every connector constructor.
///
/// The `fetchers` table holds one section per connector name; any other
/// top-level section is kept verbatim so connectors can read shared settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Per-connector sections keyed by registered connector name.
    #[serde(default)]
    pub fetchers: BTreeMap<String, serde_json::Value>,
    /// Remaining sections, passed through unmodified.
    #[serde(flatten)]
    pub sections: BTreeMap<String, serde_json::Value>,
}

impl FetchConfig {
    /// Parse a JSON document.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the text is not a JSON object of the expected shape.
    pub fn from_json_str(text: &str) -> Result<Self, GmError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a JSON file.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GmError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            GmError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    /// Raw section for a connector, if configured.
    #[must_use]
    pub fn fetcher_section(&self, name: &str) -> Option<&serde_json::Value> {
        self.fetchers.get(name)
    }

    /// Deserialize a connector's section into its own settings type.
    ///
    /// # Errors
    /// Returns `InvalidConfig` when the section exists but does not match `T`.
    pub fn fetcher_settings<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, GmError> {
        self.fetchers
            .get(name)
            .map(|v| {
                serde_json::from_value(v.clone())
                    .map_err(|e| GmError::InvalidConfig(format!("fetchers.{name}: {e}")))
            })
            .transpose()
    }

    /// Builder-style helper to set a connector section.
    #[must_use]
    pub fn with_fetcher(mut self, name: impl Into<String>, section: serde_json::Value) -> Self {
        self.fetchers.insert(name.into(), section);
        self
    }
}

/// Caller-supplied options for one acquisition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchOptions {
    /// Where connectors may keep downloaded artifacts. `None` means connectors
    /// use transient storage of their own and discard it.
    pub raw_dir: Option<PathBuf>,
    /// Ask connectors to drop non-free-field instruments (boreholes, structures).
    pub drop_non_free: bool,
    /// Configuration for this call; `None` uses the orchestrator's default.
    pub config: Option<Arc<FetchConfig>>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            raw_dir: None,
            drop_non_free: true,
            config: None,
        }
    }
}

impl FetchOptions {
    /// Set the raw-storage directory.
    #[must_use]
    pub fn raw_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.raw_dir = Some(dir.into());
        self
    }

    /// Toggle dropping of non-free-field instruments.
    #[must_use]
    pub const fn drop_non_free(mut self, yes: bool) -> Self {
        self.drop_non_free = yes;
        self
    }

    /// Use this configuration instead of the orchestrator default.
    #[must_use]
    pub fn config(mut self, cfg: FetchConfig) -> Self {
        self.config = Some(Arc::new(cfg));
        self
    }
}
