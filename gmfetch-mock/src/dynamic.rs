use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use gmfetch_core::{
    BoundingBox, CandidateEvent, Connector, ConnectorEntry, ConnectorParams, DirectQuery,
    EventSearch, GmError, Protocol, WaveformBatch,
};

/// Instruction for how a method should behave.
#[derive(Debug, Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value.
    Return(T),
    /// Fail with the provided error.
    Fail(GmError),
    /// Hang indefinitely (simulate a stalled provider).
    Hang,
    /// Panic inside the connector.
    Panic,
}

#[derive(Debug)]
struct InternalState {
    bounding_box: BoundingBox,
    construct_error: Option<GmError>,
    expose_accessor: bool,
    delay: Option<Duration>,
    events: MockBehavior<Vec<CandidateEvent>>,
    retrieve: MockBehavior<WaveformBatch>,
    constructed: Vec<ConnectorParams>,
    solve_flags: Vec<bool>,
    retrieved_events: Vec<CandidateEvent>,
    retrieve_calls: usize,
    settled_calls: usize,
}

impl Default for InternalState {
    fn default() -> Self {
        Self {
            bounding_box: BoundingBox::GLOBAL,
            construct_error: None,
            expose_accessor: true,
            delay: None,
            events: MockBehavior::Return(Vec::new()),
            retrieve: MockBehavior::Return(Vec::new()),
            constructed: Vec::new(),
            solve_flags: Vec::new(),
            retrieved_events: Vec::new(),
            retrieve_calls: 0,
            settled_calls: 0,
        }
    }
}

type SharedState = Arc<Mutex<InternalState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, InternalState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
///
/// Settings apply to instances constructed afterwards; call-time behaviors
/// (`set_*_behavior`, `set_delay`) also apply to live instances.
#[derive(Debug, Clone)]
pub struct DynamicMockController {
    state: SharedState,
}

impl DynamicMockController {
    /// Behavior of `retrieve` and `retrieve_event`.
    pub fn set_retrieve_behavior(&self, behavior: MockBehavior<WaveformBatch>) {
        lock(&self.state).retrieve = behavior;
    }

    /// Behavior of `matching_events`.
    pub fn set_events_behavior(&self, behavior: MockBehavior<Vec<CandidateEvent>>) {
        lock(&self.state).events = behavior;
    }

    /// Make construction fail with `err`.
    pub fn fail_construction(&self, err: GmError) {
        lock(&self.state).construct_error = Some(err);
    }

    /// Coverage reported by new instances.
    pub fn set_bounding_box(&self, bbox: BoundingBox) {
        lock(&self.state).bounding_box = bbox;
    }

    /// Sleep this long before answering any retrieval-phase call.
    pub fn set_delay(&self, delay: Duration) {
        lock(&self.state).delay = Some(delay);
    }

    /// New instances do not expose the accessor of their registered protocol.
    pub fn hide_accessor(&self) {
        lock(&self.state).expose_accessor = false;
    }

    /// Parameters of every construction attempt, in call order.
    #[must_use]
    pub fn constructed_params(&self) -> Vec<ConnectorParams> {
        lock(&self.state).constructed.clone()
    }

    /// Number of construction attempts.
    #[must_use]
    pub fn construct_count(&self) -> usize {
        lock(&self.state).constructed.len()
    }

    /// `solve` argument of every `matching_events` call.
    #[must_use]
    pub fn solve_flags(&self) -> Vec<bool> {
        lock(&self.state).solve_flags.clone()
    }

    /// Catalog events passed to `retrieve_event`, in call order.
    #[must_use]
    pub fn retrieved_events(&self) -> Vec<CandidateEvent> {
        lock(&self.state).retrieved_events.clone()
    }

    /// Number of `retrieve` and `retrieve_event` calls.
    #[must_use]
    pub fn retrieve_calls(&self) -> usize {
        lock(&self.state).retrieve_calls
    }

    /// Number of calls that got past their delay and resolved.
    #[must_use]
    pub fn settled_calls(&self) -> usize {
        lock(&self.state).settled_calls
    }

    /// Reset behaviors and call logs.
    pub fn clear_all_behaviors(&self) {
        *lock(&self.state) = InternalState::default();
    }
}

/// A connector that defers all behavior to an external controller.
pub struct DynamicMockConnector {
    name: &'static str,
    protocol: Protocol,
    bounding_box: BoundingBox,
    expose_accessor: bool,
    state: SharedState,
}

impl DynamicMockConnector {
    /// Create a registry entry for a dynamic mock and its controller.
    ///
    /// Every construction through the entry is logged by the controller and
    /// yields a fresh instance sharing the controller's behaviors.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
        protocol: Protocol,
    ) -> (ConnectorEntry, DynamicMockController) {
        let state: SharedState = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let entry = ConnectorEntry::new(name, protocol, move |params: &ConnectorParams| {
            let mut guard = lock(&state);
            guard.constructed.push(params.clone());
            if let Some(err) = guard.construct_error.clone() {
                return Err(err);
            }
            let me = Self {
                name,
                protocol,
                bounding_box: guard.bounding_box,
                expose_accessor: guard.expose_accessor,
                state: Arc::clone(&state),
            };
            Ok(Arc::new(me) as Arc<dyn Connector>)
        });
        (entry, controller)
    }

    async fn answer<T>(&self, pick: impl FnOnce(&mut InternalState) -> MockBehavior<T>) -> Result<T, GmError> {
        // Snapshot without holding the lock across await points
        let (behavior, delay) = {
            let mut guard = lock(&self.state);
            let behavior = pick(&mut guard);
            (behavior, guard.delay)
        };
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
        lock(&self.state).settled_calls += 1;
        match behavior {
            MockBehavior::Return(v) => Ok(v),
            MockBehavior::Fail(e) => Err(e),
            MockBehavior::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            MockBehavior::Panic => panic!("{} panicked on request", self.name),
        }
    }
}

impl Connector for DynamicMockConnector {
    fn name(&self) -> &str {
        self.name
    }

    fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    fn as_direct_query(&self) -> Option<&dyn DirectQuery> {
        (self.expose_accessor && self.protocol == Protocol::DirectQuery)
            .then_some(self as &dyn DirectQuery)
    }

    fn as_event_search(&self) -> Option<&dyn EventSearch> {
        (self.expose_accessor && self.protocol == Protocol::EventSearch)
            .then_some(self as &dyn EventSearch)
    }
}

#[async_trait]
impl DirectQuery for DynamicMockConnector {
    async fn retrieve(&self) -> Result<WaveformBatch, GmError> {
        self.answer(|s| {
            s.retrieve_calls += 1;
            s.retrieve.clone()
        })
        .await
    }
}

#[async_trait]
impl EventSearch for DynamicMockConnector {
    async fn matching_events(&self, solve: bool) -> Result<Vec<CandidateEvent>, GmError> {
        self.answer(|s| {
            s.solve_flags.push(solve);
            s.events.clone()
        })
        .await
    }

    async fn retrieve_event(&self, event: &CandidateEvent) -> Result<WaveformBatch, GmError> {
        let event = event.clone();
        self.answer(move |s| {
            s.retrieve_calls += 1;
            s.retrieved_events.push(event);
            s.retrieve.clone()
        })
        .await
    }
}
