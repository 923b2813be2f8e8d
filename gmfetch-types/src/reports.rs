//! Report envelope produced by the acquisition orchestrator.

use serde::{Deserialize, Serialize};

use crate::error::GmError;
use crate::waveform::StreamCollection;

/// Combined outcome of one acquisition.
///
/// `streams` is the concatenation of every successfully retrieved batch in
/// candidate order. `errors` has one entry per connector that could not be
/// built, found no matching event, or failed during retrieval, in the order
/// those failures were recorded. A connector returning an empty batch adds
/// nothing to either list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FetchReport {
    /// Retrieved waveforms.
    pub streams: StreamCollection,
    /// Non-fatal per-connector failures.
    pub errors: Vec<GmError>,
}

impl FetchReport {
    /// Human-readable rendering of `errors`.
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Split into the waveform collection and the rendered error list.
    #[must_use]
    pub fn into_parts(self) -> (StreamCollection, Vec<String>) {
        let messages = self.error_messages();
        (self.streams, messages)
    }

    /// True when no connector failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
