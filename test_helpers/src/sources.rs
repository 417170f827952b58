//! Scripted property sources for timing-sensitive loader tests.
//!
//! A [`ScriptedSource`] plays back a list of [`Step`]s, sleeping on the
//! tokio clock before each one, so tests using a paused runtime get exact
//! virtual timings. Every invocation, emission, failure and completion is
//! written to a shared [`EventLog`].

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use futures::stream;
use parking_lot::Mutex;
use prop_loader::{Properties, PropertySource, SourceLoad, SourceOptions};
use tokio::time::Instant;

/// What happened to a scripted source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// `load()` was called.
    Invoked,
    /// A batch was handed to the loader.
    Emitted,
    /// The source reported a failure.
    Failed,
    /// The sequence ended without failing.
    Completed,
}

/// One entry in an [`EventLog`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// Name of the source.
    pub source: String,
    /// What happened.
    pub kind: EventKind,
    /// Time since the log was created.
    pub at: Duration,
}

/// Shared, ordered record of source events.
///
/// Create the log inside the test runtime so its origin matches the
/// (possibly paused) tokio clock.
#[derive(Clone, Debug)]
pub struct EventLog {
    origin: Instant,
    events: Arc<Mutex<Vec<Event>>>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    /// Start an empty log at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Append an event for `source`.
    pub fn record(&self, source: &str, kind: EventKind) {
        self.events.lock().push(Event {
            source: source.to_owned(),
            kind,
            at: self.origin.elapsed(),
        });
    }

    /// Every event so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    /// Index of the first `kind` event for `source`.
    #[must_use]
    pub fn position(&self, source: &str, kind: EventKind) -> Option<usize> {
        self.events
            .lock()
            .iter()
            .position(|event| event.source == source && event.kind == kind)
    }

    /// Time of the first `kind` event for `source`.
    #[must_use]
    pub fn first_at(&self, source: &str, kind: EventKind) -> Option<Duration> {
        self.events
            .lock()
            .iter()
            .find(|event| event.source == source && event.kind == kind)
            .map(|event| event.at)
    }

    /// Number of `kind` events for `source`.
    #[must_use]
    pub fn count(&self, source: &str, kind: EventKind) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| event.source == source && event.kind == kind)
            .count()
    }
}

/// One scripted action.
#[derive(Clone, Debug)]
pub enum Step {
    /// Wait, then emit `batch`.
    Emit {
        /// Delay before emitting.
        after: Duration,
        /// Batch to emit.
        batch: Properties,
    },
    /// Wait, then fail with `message`.
    Fail {
        /// Delay before failing.
        after: Duration,
        /// Error message reported to the loader.
        message: String,
    },
}

/// A source that plays back scripted steps.
///
/// # Examples
///
/// ```
/// use prop_loader::SourceOptions;
/// use prop_loader_test_helpers::sources::{EventLog, ScriptedSource};
/// use serde_json::json;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let log = EventLog::new();
/// let source = ScriptedSource::new("A", &log)
///     .emit(5, json!({"a": 0}))
///     .with_options(SourceOptions::default().required_to_load(true));
/// # let _ = source;
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct ScriptedSource {
    name: String,
    options: SourceOptions,
    steps: Vec<Step>,
    hang: bool,
    log: EventLog,
}

impl ScriptedSource {
    /// Create a source with no steps that records into `log`.
    #[must_use]
    pub fn new(name: impl Into<String>, log: &EventLog) -> Self {
        Self {
            name: name.into(),
            options: SourceOptions::default(),
            steps: Vec::new(),
            hang: false,
            log: log.clone(),
        }
    }

    /// Emit `batch` `after_ms` milliseconds after the previous step.
    #[must_use]
    pub fn emit(mut self, after_ms: u64, batch: Properties) -> Self {
        self.steps.push(Step::Emit {
            after: Duration::from_millis(after_ms),
            batch,
        });
        self
    }

    /// Fail with `message` `after_ms` milliseconds after the previous step.
    #[must_use]
    pub fn fail(mut self, after_ms: u64, message: impl Into<String>) -> Self {
        self.steps.push(Step::Fail {
            after: Duration::from_millis(after_ms),
            message: message.into(),
        });
        self
    }

    /// Never complete once the steps are exhausted.
    #[must_use]
    pub const fn hang(mut self) -> Self {
        self.hang = true;
        self
    }

    /// Replace the source's options.
    #[must_use]
    pub fn with_options(mut self, options: SourceOptions) -> Self {
        self.options = options;
        self
    }

    /// Share as a trait object.
    #[must_use]
    pub fn shared(self) -> Arc<dyn PropertySource> {
        Arc::new(self)
    }
}

struct Playback {
    name: String,
    steps: std::vec::IntoIter<Step>,
    hang: bool,
    log: EventLog,
}

impl PropertySource for ScriptedSource {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn options(&self) -> SourceOptions {
        self.options.clone()
    }

    fn load(&self) -> SourceLoad {
        self.log.record(&self.name, EventKind::Invoked);
        let playback = Playback {
            name: self.name.clone(),
            steps: self.steps.clone().into_iter(),
            hang: self.hang,
            log: self.log.clone(),
        };
        SourceLoad::stream(stream::unfold(Some(playback), |state| async move {
            let mut playback = state?;
            match playback.steps.next() {
                Some(Step::Emit { after, batch }) => {
                    tokio::time::sleep(after).await;
                    playback.log.record(&playback.name, EventKind::Emitted);
                    Some((Ok(batch), Some(playback)))
                }
                Some(Step::Fail { after, message }) => {
                    tokio::time::sleep(after).await;
                    playback.log.record(&playback.name, EventKind::Failed);
                    Some((Err(message), None))
                }
                None => {
                    if playback.hang {
                        std::future::pending::<()>().await;
                    }
                    playback.log.record(&playback.name, EventKind::Completed);
                    None
                }
            }
        }))
    }
}
