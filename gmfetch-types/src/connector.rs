//! Connector metadata types usable across crates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Retrieval protocol a connector declares at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Protocol {
    /// Fetches waveforms for the event window directly.
    DirectQuery,
    /// Resolves a matching catalog event first, then fetches its waveforms.
    EventSearch,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DirectQuery => "direct",
            Self::EventSearch => "event-search",
        })
    }
}

/// Geographic coverage of a connector, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western edge.
    pub lon_min: f64,
    /// Eastern edge.
    pub lon_max: f64,
    /// Southern edge.
    pub lat_min: f64,
    /// Northern edge.
    pub lat_max: f64,
}

impl BoundingBox {
    /// The whole globe. Events exactly on the antimeridian or a pole fall outside.
    pub const GLOBAL: Self = Self::new(-180.0, 180.0, -90.0, 90.0);

    /// Build a box from `(lon_min, lon_max, lat_min, lat_max)`.
    #[must_use]
    pub const fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Self {
        Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        }
    }

    /// True when the point lies strictly inside the box.
    ///
    /// Edges are excluded: a connector whose coverage boundary touches the
    /// event does not cover it. NaN coordinates are never contained.
    #[must_use]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.lon_min < lon && lon < self.lon_max && self.lat_min < lat && lat < self.lat_max
    }
}
