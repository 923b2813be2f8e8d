//! Event descriptors: the earthquake being requested and the catalog events
//! that event-search connectors match against it.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GmError;

/// Origin of the earthquake whose recordings are requested.
///
/// Immutable once constructed; validation happens in [`EventDescriptor::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventDescriptor {
    time: DateTime<Utc>,
    latitude: f64,
    longitude: f64,
    depth_km: f64,
    magnitude: f64,
}

impl EventDescriptor {
    /// Build a descriptor from origin time, latitude, longitude, depth (km) and magnitude.
    ///
    /// # Errors
    /// Returns `InvalidArg` if any value is not finite, latitude is outside
    /// [-90, 90], or longitude is outside [-180, 180].
    pub fn new(
        time: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
        depth_km: f64,
        magnitude: f64,
    ) -> Result<Self, GmError> {
        for (label, v) in [
            ("latitude", latitude),
            ("longitude", longitude),
            ("depth", depth_km),
            ("magnitude", magnitude),
        ] {
            if !v.is_finite() {
                return Err(GmError::InvalidArg(format!("{label} must be finite, got {v}")));
            }
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GmError::InvalidArg(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GmError::InvalidArg(format!(
                "longitude {longitude} outside [-180, 180]"
            )));
        }
        Ok(Self {
            time,
            latitude,
            longitude,
            depth_km,
            magnitude,
        })
    }

    /// Origin time.
    #[must_use]
    pub const fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// Origin latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Origin longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Origin depth in kilometres.
    #[must_use]
    pub const fn depth_km(&self) -> f64 {
        self.depth_km
    }

    /// Event magnitude.
    #[must_use]
    pub const fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Fixed-format rendering used in error messages:
    /// `<time> M<mag:.1> (<lat:.4>,<lon:.4>)`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} M{:.1} ({:.4},{:.4})",
            self.time.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            self.magnitude,
            self.latitude,
            self.longitude
        )
    }
}

impl fmt::Display for EventDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// A catalog event returned by an event-search connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateEvent {
    /// Provider catalog identifier.
    pub id: String,
    /// Catalog origin time.
    pub time: DateTime<Utc>,
    /// Catalog latitude in degrees.
    pub latitude: f64,
    /// Catalog longitude in degrees.
    pub longitude: f64,
    /// Catalog depth in kilometres.
    pub depth_km: f64,
    /// Catalog magnitude.
    pub magnitude: f64,
}

impl CandidateEvent {
    /// Candidate that mirrors the requested event exactly, under a catalog id.
    #[must_use]
    pub fn from_descriptor(id: impl Into<String>, event: &EventDescriptor) -> Self {
        Self {
            id: id.into(),
            time: event.time(),
            latitude: event.latitude(),
            longitude: event.longitude(),
            depth_km: event.depth_km(),
            magnitude: event.magnitude(),
        }
    }
}
