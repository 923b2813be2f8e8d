use std::sync::Arc;

use gmfetch_core::{Connector, EventDescriptor, GmError, Protocol, WaveformBatch};

use crate::core::tag_err;

/// Run the retrieval phase of one candidate according to its registered protocol.
///
/// # Errors
/// `NoMatch` when an event-search connector finds no catalog event, otherwise
/// the connector's failure attributed to it as a retrieval error.
pub(crate) async fn retrieve_one(
    name: &str,
    protocol: Protocol,
    connector: Arc<dyn Connector>,
    event: &EventDescriptor,
) -> Result<WaveformBatch, GmError> {
    match protocol {
        Protocol::DirectQuery => {
            let Some(dq) = connector.as_direct_query() else {
                return Err(GmError::retrieval(
                    name,
                    "registered as direct-query but does not provide it",
                ));
            };
            dq.retrieve().await.map_err(|e| tag_err(name, e))
        }
        Protocol::EventSearch => {
            let Some(es) = connector.as_event_search() else {
                return Err(GmError::retrieval(
                    name,
                    "registered as event-search but does not provide it",
                ));
            };
            let events = es
                .matching_events(true)
                .await
                .map_err(|e| tag_err(name, e))?;
            // Best match first; the connector already ranked them.
            let Some(best) = events.first() else {
                return Err(GmError::no_match(name, event.summary()));
            };
            es.retrieve_event(best).await.map_err(|e| tag_err(name, e))
        }
    }
}
