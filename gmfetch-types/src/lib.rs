//! gmfetch-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod config;
mod connector;
mod error;
mod event;
mod reports;
mod waveform;

pub use config::{AcquirerConfig, FetchConfig, FetchOptions, RetrievalPolicy};
pub use connector::{BoundingBox, Protocol};
pub use error::GmError;
pub use event::{CandidateEvent, EventDescriptor};
pub use reports::FetchReport;
pub use waveform::{Stream, StreamCollection, Trace, TraceId, WaveformBatch};
