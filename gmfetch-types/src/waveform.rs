//! Minimal waveform containers exchanged between connectors and downstream
//! processing. The orchestrator only concatenates them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// SEED-style channel identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TraceId {
    /// Network code.
    pub network: String,
    /// Station code.
    pub station: String,
    /// Location code (often empty or "--").
    pub location: String,
    /// Channel code.
    pub channel: String,
}

impl TraceId {
    /// Build an identifier from its four codes.
    pub fn new(
        network: impl Into<String>,
        station: impl Into<String>,
        location: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            network: network.into(),
            station: station.into(),
            location: location.into(),
            channel: channel.into(),
        }
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.network, self.station, self.location, self.channel
        )
    }
}

/// A single-channel time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Channel identifier.
    pub id: TraceId,
    /// Time of the first sample.
    pub start: DateTime<Utc>,
    /// Samples per second.
    pub sampling_rate: f64,
    /// Raw samples.
    pub data: Vec<f64>,
}

impl Trace {
    /// Number of samples.
    #[must_use]
    pub fn npts(&self) -> usize {
        self.data.len()
    }
}

/// The traces recorded by one station.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Stream {
    /// Channel traces, in provider order.
    pub traces: Vec<Trace>,
}

impl Stream {
    /// Wrap a set of traces.
    #[must_use]
    pub const fn new(traces: Vec<Trace>) -> Self {
        Self { traces }
    }

    /// `NET.STA` of the first trace, if any.
    #[must_use]
    pub fn station_code(&self) -> Option<String> {
        self.traces
            .first()
            .map(|t| format!("{}.{}", t.id.network, t.id.station))
    }
}

/// Ordered sequence of streams returned by one connector call.
pub type WaveformBatch = Vec<Stream>;

/// Ordered concatenation of every batch retrieved during one acquisition.
///
/// Always present in a report; may be empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StreamCollection {
    streams: Vec<Stream>,
}

impl StreamCollection {
    /// Empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            streams: Vec::new(),
        }
    }

    /// Append a batch, preserving its internal order.
    pub fn push_batch(&mut self, batch: WaveformBatch) {
        self.streams.extend(batch);
    }

    /// Number of streams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// True when no stream was retrieved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Iterate streams in acquisition order.
    pub fn iter(&self) -> std::slice::Iter<'_, Stream> {
        self.streams.iter()
    }

    /// Iterate every trace of every stream in acquisition order.
    pub fn traces(&self) -> impl Iterator<Item = &Trace> {
        self.streams.iter().flat_map(|s| s.traces.iter())
    }

    /// Channel identifiers in acquisition order.
    #[must_use]
    pub fn channel_ids(&self) -> Vec<&TraceId> {
        self.traces().map(|t| &t.id).collect()
    }

    /// Borrow the underlying streams.
    #[must_use]
    pub fn as_slice(&self) -> &[Stream] {
        &self.streams
    }
}

impl From<Vec<Stream>> for StreamCollection {
    fn from(streams: Vec<Stream>) -> Self {
        Self { streams }
    }
}

impl IntoIterator for StreamCollection {
    type Item = Stream;
    type IntoIter = std::vec::IntoIter<Stream>;

    fn into_iter(self) -> Self::IntoIter {
        self.streams.into_iter()
    }
}

impl<'a> IntoIterator for &'a StreamCollection {
    type Item = &'a Stream;
    type IntoIter = std::slice::Iter<'a, Stream>;

    fn into_iter(self) -> Self::IntoIter {
        self.streams.iter()
    }
}
