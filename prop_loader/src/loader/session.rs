//! One run of the loading algorithm over a fixed set of sources.
//!
//! A session owns the completion signal handed back to the caller, the set
//! of gating sources it is still waiting on and the cancellation channel
//! every source task listens to. All store writes happen while the session
//! lock is held, after re-checking the cancellation state, so nothing is
//! written once the session has been destroyed or a sibling has dismissed
//! the source.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::TimeoutPolicy;
use super::lane::{self, SourceEntry};
use crate::{PropError, PropResult, PropertyService, Properties, SourceError};

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

/// Receiving half of a session's completion signal.
pub(super) type Completion = oneshot::Receiver<PropResult<()>>;

/// Cancellation state broadcast to every source task of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum CancelState {
    Active,
    /// A `dismiss_other_sources` batch arrived; only `by` may keep writing.
    Dismissed { by: usize },
    Destroyed,
}

impl CancelState {
    /// Whether `source` must stop.
    pub(super) const fn halts(self, source: usize) -> bool {
        match self {
            Self::Active => false,
            Self::Dismissed { by } => by != source,
            Self::Destroyed => true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Running,
    Resolved,
    Rejected,
}

#[derive(Debug)]
struct State {
    phase: Phase,
    gating: HashSet<usize>,
    completion: Option<oneshot::Sender<PropResult<()>>>,
}

#[derive(Debug)]
pub(super) struct Session {
    id: u64,
    label: &'static str,
    service: PropertyService,
    state: Mutex<State>,
    cancel: watch::Sender<CancelState>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Session {
    /// Create a session for `entries`, dispatch both lanes and return the
    /// completion receiver.
    ///
    /// The gating set is every required source. With none, it is every
    /// source that short-circuits; with none of those either, the session
    /// resolves as soon as the lanes are dispatched.
    pub(super) fn start(
        label: &'static str,
        service: PropertyService,
        entries: Vec<SourceEntry>,
    ) -> (Arc<Self>, Completion) {
        let required: HashSet<usize> = entries
            .iter()
            .filter(|entry| entry.options.required_to_load)
            .map(|entry| entry.id)
            .collect();
        let gating = if required.is_empty() {
            entries
                .iter()
                .filter(|entry| entry.options.short_circuits())
                .map(|entry| entry.id)
                .collect()
        } else {
            required
        };

        let (sender, receiver) = oneshot::channel();
        let (cancel, _) = watch::channel(CancelState::Active);
        let session = Arc::new(Self {
            id: NEXT_SESSION.fetch_add(1, Ordering::Relaxed),
            label,
            service,
            state: Mutex::new(State {
                phase: Phase::Running,
                gating,
                completion: Some(sender),
            }),
            cancel,
            tasks: Mutex::new(Vec::new()),
        });
        debug!(
            session = session.id,
            label,
            sources = entries.len(),
            "starting property load session"
        );
        session.dispatch(entries);

        let mut state = session.state.lock();
        if state.gating.is_empty() {
            session.resolve(&mut state, "no gating sources");
        }
        drop(state);
        (session, receiver)
    }

    fn dispatch(self: &Arc<Self>, entries: Vec<SourceEntry>) {
        let (ordered, unordered): (Vec<_>, Vec<_>) = entries
            .into_iter()
            .partition(|entry| entry.options.load_in_order);
        let mut tasks = self.tasks.lock();
        for entry in unordered {
            let session = Arc::clone(self);
            tasks.push(tokio::spawn(async move {
                lane::drive_source(&session, &entry).await;
            }));
        }
        if !ordered.is_empty() {
            tasks.push(tokio::spawn(lane::drive_ordered(Arc::clone(self), ordered)));
        }
    }

    /// Subscribe to the cancellation channel.
    pub(super) fn cancellation(&self) -> watch::Receiver<CancelState> {
        self.cancel.subscribe()
    }

    /// Whether `source` has been told to stop.
    pub(super) fn halts(&self, source: usize) -> bool {
        self.cancel.borrow().halts(source)
    }

    /// Apply one batch emitted by `entry`.
    pub(super) fn apply_batch(&self, entry: &SourceEntry, batch: Properties) {
        let mut state = self.state.lock();
        if self.halts(entry.id) {
            debug!(
                session = self.id,
                source = %entry.name,
                "dropping batch from halted source"
            );
            return;
        }
        let options = &entry.options;
        if options.reset_environment {
            self.service.reset();
        }
        self.service.apply(options.strategy, batch, options.path.as_ref());
        debug!(
            session = self.id,
            source = %entry.name,
            strategy = ?options.strategy,
            path = ?options.path.as_ref().map(ToString::to_string),
            "applied property batch"
        );

        if options.dismiss_other_sources {
            self.cancel
                .send_replace(CancelState::Dismissed { by: entry.id });
            self.resolve(&mut state, "source dismissed its siblings");
        }
        if options.load_immediately {
            self.resolve(&mut state, "source loads immediately");
        }
        self.release(&mut state, entry.id);
    }

    /// Record a failure reported by `entry`.
    ///
    /// Only a required, non-ignored source failing while the session is
    /// still running rejects it. Every other failure is logged and treated
    /// as an empty batch.
    pub(super) fn fail_source(&self, entry: &SourceEntry, cause: SourceError) {
        let mut state = self.state.lock();
        if self.halts(entry.id) {
            debug!(
                session = self.id,
                source = %entry.name,
                "ignoring failure from halted source"
            );
            return;
        }
        let options = &entry.options;
        let propagates =
            options.required_to_load && !options.ignore_error && state.phase == Phase::Running;
        let rejection = propagates.then(|| PropError::required_source(&entry.name, &cause));
        let diagnostic = PropError::source_load(&entry.name, cause);
        match rejection {
            Some(rejection) => {
                error!(
                    session = self.id,
                    error = %diagnostic,
                    "required property source failed"
                );
                self.reject(&mut state, rejection.shared());
            }
            None => {
                error!(
                    session = self.id,
                    error = %diagnostic,
                    "property source failed; continuing without its batch"
                );
                self.release(&mut state, entry.id);
            }
        }
    }

    /// Mark `entry`'s sequence as complete.
    pub(super) fn finish_source(&self, entry: &SourceEntry) {
        let mut state = self.state.lock();
        debug!(session = self.id, source = %entry.name, "property source completed");
        self.release(&mut state, entry.id);
    }

    /// Settle an unsettled session whose maximum load time elapsed.
    pub(super) fn expire(&self, limit: Duration, policy: TimeoutPolicy) {
        let mut state = self.state.lock();
        if state.phase != Phase::Running {
            return;
        }
        warn!(
            session = self.id,
            label = self.label,
            ?limit,
            ?policy,
            pending = state.gating.len(),
            "property load exceeded its maximum load time"
        );
        match policy {
            TimeoutPolicy::Release => self.resolve(&mut state, "maximum load time elapsed"),
            TimeoutPolicy::Cancel => {
                self.resolve(&mut state, "maximum load time elapsed");
                drop(state);
                self.destroy();
            }
            TimeoutPolicy::Fail => {
                self.reject(&mut state, PropError::LoadTimeout { elapsed: limit }.shared());
            }
        }
    }

    /// Stop every source task and block further writes.
    ///
    /// A session that has not settled yet is rejected with
    /// [`PropError::Cancelled`].
    pub(super) fn destroy(&self) {
        let mut state = self.state.lock();
        self.cancel.send_replace(CancelState::Destroyed);
        state.gating.clear();
        if state.phase == Phase::Running {
            self.reject(&mut state, PropError::Cancelled.shared());
        }
        drop(state);
        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
        debug!(session = self.id, label = self.label, "destroyed property load session");
    }

    /// Whether the session has settled and every source task has exited.
    pub(super) fn is_finished(&self) -> bool {
        self.state.lock().phase != Phase::Running
            && self.tasks.lock().iter().all(JoinHandle::is_finished)
    }

    fn release(&self, state: &mut State, source: usize) {
        if state.gating.remove(&source) && state.gating.is_empty() {
            self.resolve(state, "gating sources settled");
        }
    }

    fn resolve(&self, state: &mut State, reason: &'static str) {
        if state.phase != Phase::Running {
            return;
        }
        state.phase = Phase::Resolved;
        info!(session = self.id, label = self.label, reason, "property load resolved");
        self.settle(state, Ok(()));
    }

    fn reject(&self, state: &mut State, error: Arc<PropError>) {
        if state.phase != Phase::Running {
            return;
        }
        state.phase = Phase::Rejected;
        info!(session = self.id, label = self.label, %error, "property load rejected");
        self.settle(state, Err(error));
    }

    fn settle(&self, state: &mut State, outcome: PropResult<()>) {
        let Some(sender) = state.completion.take() else {
            return;
        };
        if sender.send(outcome).is_err() {
            debug!(session = self.id, "completion receiver dropped before settling");
        }
    }
}
