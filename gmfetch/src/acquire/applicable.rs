use std::sync::Arc;

use gmfetch_core::{Connector, ConnectorParams, ConnectorRegistry, GmError, Protocol};

/// A connector that was built for this acquisition and covers the event.
pub(crate) struct Candidate {
    pub(crate) name: String,
    pub(crate) protocol: Protocol,
    pub(crate) connector: Arc<dyn Connector>,
}

/// Instantiate every registered connector in registry order and keep those
/// whose coverage strictly contains the event epicenter.
///
/// Constructor failures are appended to `errors`; out-of-region connectors are
/// dropped without an entry.
pub(crate) fn select(
    registry: &ConnectorRegistry,
    params: &ConnectorParams,
    errors: &mut Vec<GmError>,
) -> Vec<Candidate> {
    let lat = params.event.latitude();
    let lon = params.event.longitude();
    let mut candidates = Vec::new();
    for entry in registry.iter() {
        let connector = match entry.construct(params) {
            Ok(c) => c,
            Err(e) => {
                let err = GmError::construction(entry.name(), e.detail());
                #[cfg(feature = "tracing")]
                tracing::warn!(connector = entry.name(), error = %err, "connector construction failed");
                errors.push(err);
                continue;
            }
        };
        if !connector.bounding_box().contains(lat, lon) {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                connector = entry.name(),
                lat,
                lon,
                "event outside connector coverage"
            );
            continue;
        }
        candidates.push(Candidate {
            name: entry.name().to_string(),
            protocol: entry.protocol(),
            connector,
        });
    }
    candidates
}
