//! gmfetch-core
//!
//! Core traits and registry shared across the gmfetch ecosystem.
//!
//! - `types`: event descriptors, bounding boxes, waveform containers, errors.
//! - `connector`: the `Connector` contract and its two retrieval roles,
//!   `DirectQuery` and `EventSearch`.
//! - `registry`: link-time connector registration and the name-keyed
//!   `ConnectorRegistry` the orchestrator iterates.
//! - `config`: the default configuration source.
//!
//! Connectors are plain Rust types. A connector crate implements
//! `Connector` plus `ConstructConnector` and registers itself, either with
//! `#[gmfetch_macros::register_connector]` or by submitting a
//! `ConnectorRegistration` through the re-exported `inventory`.
#![warn(missing_docs)]

/// Default configuration source.
pub mod config;
/// Connector contract traits and constructor parameters.
pub mod connector;
/// Connector registration and discovery.
pub mod registry;
pub mod types;

#[doc(hidden)]
pub use inventory;

pub use config::{CONFIG_ENV, load_default_config};
pub use connector::{Connector, ConnectorParams, ConstructConnector, DirectQuery, EventSearch};
pub use registry::{ConnectorEntry, ConnectorRegistration, ConnectorRegistry, RegistryBuilder};
pub use types::*;
