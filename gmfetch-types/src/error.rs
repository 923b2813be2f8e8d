use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the gmfetch workspace.
///
/// Covers registry discovery failures, per-connector construction and retrieval
/// failures, event-search misses, timeouts, and configuration problems.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GmError {
    /// The connector registry could not be assembled. Always fatal.
    #[error("connector discovery failed: {0}")]
    Discovery(String),

    /// A registered connector could not be instantiated for the event.
    #[error("Could not instantiate Fetcher {connector}, due to error \"{msg}\"")]
    Construction {
        /// Registered connector name.
        connector: String,
        /// Message produced by the connector's constructor.
        msg: String,
    },

    /// An event-search connector found no catalog event matching the request.
    #[error("No event matching {summary} found by class {connector}")]
    NoMatch {
        /// Registered connector name.
        connector: String,
        /// Fixed-format rendering of the requested event.
        summary: String,
    },

    /// A connector matched the event but failed while retrieving waveforms.
    #[error("Fetcher {connector} failed to retrieve data, due to error \"{msg}\"")]
    Retrieval {
        /// Registered connector name.
        connector: String,
        /// Human-readable cause.
        msg: String,
    },

    /// An individual connector call exceeded the configured timeout.
    #[error("provider timed out: {capability} via {connector}")]
    ProviderTimeout {
        /// Connector name that timed out.
        connector: String,
        /// Operation label (e.g. "retrieve", "matching_events").
        capability: String,
    },

    /// The overall request exceeded the configured deadline.
    #[error("request timed out: {capability}")]
    RequestTimeout {
        /// Operation label for which the request timed out.
        capability: String,
    },

    /// Configuration could not be read or did not match the expected shape.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Issues with the returned or expected data (missing fields, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// A connector reported a failure of its own.
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// Unknown/opaque error.
    #[error("{0}")]
    Other(String),
}

impl GmError {
    /// Helper: build a `Discovery` error.
    pub fn discovery(msg: impl Into<String>) -> Self {
        Self::Discovery(msg.into())
    }

    /// Helper: build a `Construction` error tagged with the connector name.
    pub fn construction(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Construction {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NoMatch` error for an event summary.
    pub fn no_match(connector: impl Into<String>, summary: impl Into<String>) -> Self {
        Self::NoMatch {
            connector: connector.into(),
            summary: summary.into(),
        }
    }

    /// Helper: build a `Retrieval` error tagged with the connector name.
    pub fn retrieval(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Retrieval {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Connector` error with the connector name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(connector: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            connector: connector.into(),
            capability: capability.into(),
        }
    }

    /// Helper: build a `RequestTimeout` error.
    #[must_use]
    pub fn request_timeout(capability: impl Into<String>) -> Self {
        Self::RequestTimeout {
            capability: capability.into(),
        }
    }

    /// The bare cause carried by this error, without the variant prefix.
    ///
    /// Used when a connector error is wrapped into a per-connector report entry,
    /// so that `InvalidConfig("bad config")` reads as `bad config`.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Discovery(m)
            | Self::InvalidConfig(m)
            | Self::InvalidArg(m)
            | Self::Data(m)
            | Self::Other(m) => m.clone(),
            Self::Connector { msg, .. }
            | Self::Construction { msg, .. }
            | Self::Retrieval { msg, .. } => msg.clone(),
            other => other.to_string(),
        }
    }

    /// True for failures the orchestrator records and moves past: a connector
    /// that could not be built, or one that found no matching event.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Construction { .. } | Self::NoMatch { .. })
    }

    /// True for failures raised while a matched connector was retrieving data.
    #[must_use]
    pub const fn is_retrieval(&self) -> bool {
        matches!(
            self,
            Self::Retrieval { .. } | Self::ProviderTimeout { .. } | Self::RequestTimeout { .. }
        )
    }

    /// Connector name this error is attributed to, if any.
    #[must_use]
    pub fn connector_name(&self) -> Option<&str> {
        match self {
            Self::Construction { connector, .. }
            | Self::NoMatch { connector, .. }
            | Self::Retrieval { connector, .. }
            | Self::ProviderTimeout { connector, .. }
            | Self::Connector { connector, .. } => Some(connector),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GmError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidConfig(e.to_string())
    }
}

impl From<std::io::Error> for GmError {
    fn from(e: std::io::Error) -> Self {
        Self::Other(e.to_string())
    }
}
