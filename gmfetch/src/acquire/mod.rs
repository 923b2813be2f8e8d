//! Acquisition: applicability filtering, concurrent retrieval and ordered aggregation.

mod applicable;
mod dispatch;

use std::collections::HashMap;
use std::sync::Arc;

use gmfetch_core::{
    ConnectorParams, EventDescriptor, FetchOptions, FetchReport, GmError, RetrievalPolicy,
    WaveformBatch,
};
use tokio::sync::Semaphore;
use tokio::task::{self, JoinError, JoinSet};

use crate::Acquirer;

const RETRIEVE_CAPABILITY: &str = "retrieve";

impl Acquirer {
    /// Acquire waveforms for `event` from every applicable connector.
    ///
    /// Every registered connector is instantiated with the event and options;
    /// those that fail to instantiate are reported and skipped, those whose
    /// bounding box does not strictly contain the epicenter are skipped
    /// silently. The remaining candidates retrieve concurrently.
    ///
    /// Behavior and trade-offs:
    /// - Waveforms are concatenated in candidate (registry) order regardless
    ///   of which connector finishes first.
    /// - Errors list construction failures in registry order, followed by
    ///   retrieval-phase failures in candidate order.
    /// - A connector that returns no waveforms without failing adds nothing.
    /// - Under `RetrievalPolicy::Abort` a retrieval failure fails the whole
    ///   call; a missing catalog match never does.
    ///
    /// # Errors
    /// Only under `RetrievalPolicy::Abort`, with the first retrieval failure
    /// in candidate order.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "gmfetch::acquire::fetch_data",
            skip(self, event, options),
            fields(event = %event.summary(), drop_non_free = options.drop_non_free),
        )
    )]
    pub async fn fetch_data(
        &self,
        event: &EventDescriptor,
        options: &FetchOptions,
    ) -> Result<FetchReport, GmError> {
        let params = self.params_for(event, options);
        let mut report = FetchReport::default();
        let candidates = applicable::select(&self.registry, &params, &mut report.errors);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            candidates = candidates.len(),
            construction_errors = report.errors.len(),
            "applicable connectors selected"
        );
        if candidates.is_empty() {
            return Ok(report);
        }

        let retrievals = self.spawn_retrievals(candidates, event);
        self.collect(retrievals, report).await
    }

    fn params_for(&self, event: &EventDescriptor, options: &FetchOptions) -> ConnectorParams {
        ConnectorParams {
            event: *event,
            raw_dir: options.raw_dir.clone(),
            config: options
                .config
                .clone()
                .unwrap_or_else(|| Arc::clone(&self.default_config)),
            drop_non_free: options.drop_non_free,
        }
    }

    fn spawn_retrievals(
        &self,
        candidates: Vec<applicable::Candidate>,
        event: &EventDescriptor,
    ) -> Retrievals {
        let limiter = self.cfg.max_concurrency.map(|n| Arc::new(Semaphore::new(n)));
        let timeout = self.cfg.provider_timeout;
        let mut retrievals = Retrievals {
            tasks: JoinSet::new(),
            index: HashMap::with_capacity(candidates.len()),
            slots: Vec::with_capacity(candidates.len()),
        };
        for c in candidates {
            let limiter = limiter.clone();
            let event = *event;
            let name = c.name.clone();
            let handle = retrievals.tasks.spawn(async move {
                // Waiting for a slot does not count against the provider timeout.
                let _permit = match limiter {
                    Some(sem) => Some(sem.acquire_owned().await.map_err(|_| {
                        GmError::retrieval(&c.name, "concurrency limiter closed")
                    })?),
                    None => None,
                };
                Self::provider_call_with_timeout(
                    &c.name,
                    RETRIEVE_CAPABILITY,
                    timeout,
                    dispatch::retrieve_one(&c.name, c.protocol, c.connector, &event),
                )
                .await
            });
            retrievals.index.insert(handle.id(), retrievals.slots.len());
            retrievals.slots.push(Slot {
                name,
                outcome: None,
            });
        }
        retrievals
    }

    /// Drain the task set, merging outcomes in candidate order as soon as each
    /// prefix is complete. Returning early drops the set, which aborts every
    /// task still running.
    async fn collect(
        &self,
        retrievals: Retrievals,
        mut report: FetchReport,
    ) -> Result<FetchReport, GmError> {
        let Retrievals {
            mut tasks,
            index,
            mut slots,
        } = retrievals;
        let deadline = self
            .cfg
            .request_timeout
            .map(|d| tokio::time::Instant::now() + d);
        let mut merged = 0;
        loop {
            let next = match deadline {
                Some(at) => match tokio::time::timeout_at(at, tasks.join_next_with_id()).await {
                    Ok(next) => next,
                    Err(_) => {
                        tasks.abort_all();
                        expire_unfinished(&mut slots[merged..]);
                        self.merge_ready(&mut slots, &mut merged, &mut report)?;
                        break;
                    }
                },
                None => tasks.join_next_with_id().await,
            };
            let Some(joined) = next else { break };
            let (id, result) = match joined {
                Ok((id, result)) => (id, Ok(result)),
                Err(e) => (e.id(), Err(e)),
            };
            let Some(&at) = index.get(&id) else { continue };
            let slot = &mut slots[at];
            slot.outcome = Some(Outcome::Finished(
                result.unwrap_or_else(|e| Err(join_failure(&slot.name, &e))),
            ));
            self.merge_ready(&mut slots, &mut merged, &mut report)?;
        }
        Ok(report)
    }

    fn merge_ready(
        &self,
        slots: &mut [Slot],
        merged: &mut usize,
        report: &mut FetchReport,
    ) -> Result<(), GmError> {
        while let Some(slot) = slots.get_mut(*merged) {
            let Some(outcome) = slot.outcome.take() else {
                break;
            };
            *merged += 1;
            match outcome {
                Outcome::Expired(e) => report.errors.push(e),
                Outcome::Finished(Ok(batch)) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(connector = %slot.name, streams = batch.len(), "connector retrieved waveforms");
                    report.streams.push_batch(batch);
                }
                Outcome::Finished(Err(e @ GmError::NoMatch { .. })) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(connector = %slot.name, error = %e, "no matching catalog event");
                    report.errors.push(e);
                }
                Outcome::Finished(Err(e)) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(connector = %slot.name, error = %e, "connector retrieval failed");
                    if self.cfg.retrieval_policy == RetrievalPolicy::Abort {
                        return Err(e);
                    }
                    report.errors.push(e);
                }
            }
        }
        Ok(())
    }
}

struct Retrievals {
    tasks: JoinSet<Result<WaveformBatch, GmError>>,
    index: HashMap<task::Id, usize>,
    slots: Vec<Slot>,
}

struct Slot {
    name: String,
    outcome: Option<Outcome>,
}

enum Outcome {
    Finished(Result<WaveformBatch, GmError>),
    /// Still running at the overall deadline; never fatal.
    Expired(GmError),
}

fn expire_unfinished(slots: &mut [Slot]) {
    for slot in slots.iter_mut().filter(|s| s.outcome.is_none()) {
        let err = GmError::retrieval(&slot.name, "acquisition deadline exceeded");
        #[cfg(feature = "tracing")]
        tracing::warn!(connector = %slot.name, error = %err, "connector did not finish before the deadline");
        slot.outcome = Some(Outcome::Expired(err));
    }
}

fn join_failure(name: &str, e: &JoinError) -> GmError {
    if e.is_panic() {
        GmError::retrieval(name, "connector task panicked")
    } else {
        GmError::retrieval(name, "connector task was cancelled")
    }
}

/// Acquire waveforms for `event` using the process-wide registry and default settings.
///
/// Equivalent to `Acquirer::builder().build()?.fetch_data(event, options)`.
///
/// # Errors
/// Returns `Discovery` when a connector name is empty or duplicated, `InvalidConfig` when
/// the default configuration cannot be loaded, and otherwise whatever
/// [`Acquirer::fetch_data`] returns.
pub async fn fetch_data(
    event: &EventDescriptor,
    options: &FetchOptions,
) -> Result<FetchReport, GmError> {
    Acquirer::builder().build()?.fetch_data(event, options).await
}
