//! Re-export of foundational types from `gmfetch-types`.
// Consolidated re-exports so connector crates can depend on `gmfetch-core` only

pub use gmfetch_types::{AcquirerConfig, FetchConfig, FetchOptions, RetrievalPolicy};
pub use gmfetch_types::{BoundingBox, Protocol};
pub use gmfetch_types::{CandidateEvent, EventDescriptor};
pub use gmfetch_types::{FetchReport, GmError};
pub use gmfetch_types::{Stream, StreamCollection, Trace, TraceId, WaveformBatch};
