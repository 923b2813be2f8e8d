//! gmfetch acquires earthquake ground-motion waveforms from every data
//! provider that covers an event.
//!
//! Overview
//! - Connectors implement the `gmfetch_core` contracts and self-register with
//!   `#[register_connector]`; the process-wide registry collects them once.
//! - For each request every registered connector is instantiated with the
//!   event, its configuration and the caller's options. Connectors that fail
//!   to instantiate are reported; connectors whose coverage does not strictly
//!   contain the epicenter are skipped.
//! - Each remaining candidate retrieves according to its registered protocol:
//!   direct-query connectors download the event window; event-search
//!   connectors resolve the best catalog match first.
//! - Results are concatenated in registry order together with one error entry
//!   per failed connector.
//!
//! Key behaviors and trade-offs
//! - Retrieval is concurrent with a per-connector timeout; an optional overall
//!   deadline turns stragglers into per-connector errors instead of failing the
//!   request.
//! - Retrieval failures are isolated per connector by default.
//!   `RetrievalPolicy::Abort` fails the request on the first one instead.
//! - Output order never depends on which connector finishes first.
//!
//! Examples
//! ```rust,ignore
//! use gmfetch::{Acquirer, EventDescriptor, FetchOptions};
//!
//! let event = EventDescriptor::new(origin, 40.0, -120.0, 10.0, 5.0)?;
//! let acquirer = Acquirer::builder()
//!     .provider_timeout(std::time::Duration::from_secs(30))
//!     .build()?;
//! let report = acquirer
//!     .fetch_data(&event, &FetchOptions::default().raw_dir("/data/raw"))
//!     .await?;
//! for msg in report.error_messages() {
//!     eprintln!("{msg}");
//! }
//! ```
#![warn(missing_docs)]

mod acquire;
pub(crate) mod core;

pub use acquire::fetch_data;
pub use core::{Acquirer, AcquirerBuilder};
pub use gmfetch_core::{
    AcquirerConfig, BoundingBox, CandidateEvent, Connector, ConnectorEntry, ConnectorParams,
    ConnectorRegistration, ConnectorRegistry, ConstructConnector, DirectQuery, EventDescriptor,
    EventSearch, FetchConfig, FetchOptions, FetchReport, GmError, Protocol, RegistryBuilder,
    RetrievalPolicy, Stream, StreamCollection, Trace, TraceId, WaveformBatch,
};
pub use gmfetch_macros::register_connector;

#[doc(hidden)]
pub use gmfetch_core::inventory;
#[doc(hidden)]
pub use gmfetch_core::registry;
