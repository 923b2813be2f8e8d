//! Deterministic synthetic waveforms.

use chrono::{DateTime, Duration, Utc};
use gmfetch_core::{CandidateEvent, EventDescriptor, Stream, Trace, TraceId, WaveformBatch};

/// Samples per second of every synthetic trace.
pub const SAMPLING_RATE: f64 = 100.0;

/// Samples per synthetic trace.
pub const NPTS: usize = 200;

/// Seconds of pre-event noise included before the origin time.
pub const PRE_EVENT_SECS: i64 = 30;

/// Channels recorded by every synthetic station.
pub const CHANNELS: [&str; 3] = ["HNE", "HNN", "HNZ"];

/// Three-component stream for one station, starting before `origin`.
#[must_use]
pub fn station_stream(network: &str, station: &str, origin: DateTime<Utc>) -> Stream {
    let start = origin - Duration::seconds(PRE_EVENT_SECS);
    let seed = station.bytes().fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)));
    let traces = CHANNELS
        .iter()
        .enumerate()
        .map(|(k, channel)| Trace {
            id: TraceId::new(network, station, "--", *channel),
            start,
            sampling_rate: SAMPLING_RATE,
            data: samples(seed, k),
        })
        .collect();
    Stream::new(traces)
}

/// One stream per station, in the given order.
#[must_use]
pub fn station_batch<S: AsRef<str>>(
    network: &str,
    stations: &[S],
    origin: DateTime<Utc>,
) -> WaveformBatch {
    stations
        .iter()
        .map(|s| station_stream(network, s.as_ref(), origin))
        .collect()
}

/// Catalog entry that mirrors the requested event, as a catalog search would return it.
#[must_use]
pub fn catalog_event(id: &str, event: &EventDescriptor) -> CandidateEvent {
    CandidateEvent::from_descriptor(id, event)
}

fn samples(seed: u32, component: usize) -> Vec<f64> {
    let phase = f64::from(seed % 360).to_radians();
    let scale = 1.0 / (component as f64 + 1.0);
    (0..NPTS)
        .map(|i| {
            let t = i as f64 / SAMPLING_RATE;
            scale * (2.0 * std::f64::consts::PI * 5.0 * t + phase).sin() * (-t).exp()
        })
        .collect()
}
