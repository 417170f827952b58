//! The scheduling core: drives sources to completion and reports readiness.
//!
//! Each call to [`Loader::load`] or [`Loader::load_submodule`] starts an
//! independent session. Sources flagged `load_in_order` run one after
//! another in declaration order; all other sources start concurrently.
//! The call returns once every required source has applied a batch (or
//! finished), once a `load_immediately` or `dismiss_other_sources` source
//! emits, or immediately when nothing gates the session. A required source
//! that fails first rejects the call.

mod lane;
mod options;
mod session;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time;

use self::lane::SourceEntry;
use self::session::{Completion, Session};
use crate::{PropError, PropResult, PropertyService, PropertySource};

pub use options::{LoaderOptions, TimeoutPolicy};

/// Callbacks notified when a submodule session settles.
///
/// They run in addition to the result returned by
/// [`Loader::load_submodule`].
#[derive(Default)]
pub struct SubmoduleHooks {
    on_load: Option<Box<dyn FnOnce() + Send>>,
    on_error: Option<Box<dyn FnOnce(&PropError) + Send>>,
}

impl SubmoduleHooks {
    /// Hooks that do nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `callback` when the submodule resolves.
    #[must_use]
    pub fn on_load(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_load = Some(Box::new(callback));
        self
    }

    /// Run `callback` with the rejection when the submodule rejects.
    #[must_use]
    pub fn on_error(mut self, callback: impl FnOnce(&PropError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    fn notify(self, outcome: &PropResult<()>) {
        match outcome {
            Ok(()) => {
                if let Some(callback) = self.on_load {
                    callback();
                }
            }
            Err(error) => {
                if let Some(callback) = self.on_error {
                    callback(error);
                }
            }
        }
    }
}

impl std::fmt::Debug for SubmoduleHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmoduleHooks")
            .field("on_load", &self.on_load.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Drives property sources into a [`PropertyService`].
///
/// Sessions spawn their source tasks on the current tokio runtime, so
/// `load()` must be awaited from within one.
#[derive(Debug)]
pub struct Loader {
    service: PropertyService,
    sources: Vec<Arc<dyn PropertySource>>,
    options: LoaderOptions,
    sessions: Mutex<Vec<Arc<Session>>>,
}

impl Loader {
    /// Create a loader for `sources` with default options.
    #[must_use]
    pub fn new(service: PropertyService, sources: Vec<Arc<dyn PropertySource>>) -> Self {
        Self {
            service,
            sources,
            options: LoaderOptions::default(),
            sessions: Mutex::new(Vec::new()),
        }
    }

    /// Start building a loader that writes into `service`.
    #[must_use]
    pub fn builder(service: PropertyService) -> LoaderBuilder {
        LoaderBuilder {
            service,
            sources: Vec::new(),
            options: LoaderOptions::default(),
        }
    }

    /// Returns the service sources write into.
    #[must_use]
    pub const fn service(&self) -> &PropertyService {
        &self.service
    }

    /// Returns the loader's options.
    #[must_use]
    pub const fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Load the loader's own sources.
    ///
    /// Sources that are still running when this returns keep writing to
    /// the store in the background.
    ///
    /// # Errors
    ///
    /// - [`PropError::RequiredSource`] when a required source without
    ///   `ignore_error` fails before the session resolves.
    /// - [`PropError::LoadTimeout`] when `max_load_time` elapses under
    ///   [`TimeoutPolicy::Fail`].
    /// - [`PropError::Cancelled`] when [`Loader::on_destroy`] runs first.
    pub async fn load(&self) -> PropResult<()> {
        let (session, completion) = self.start("load", &self.sources);
        self.wait(&session, completion).await
    }

    /// Load an independently scoped set of sources, for example a lazily
    /// loaded feature.
    ///
    /// The session is separate from any other, so its required sources do
    /// not gate [`Loader::load`]. `hooks` are notified with the outcome
    /// before it is returned.
    ///
    /// # Errors
    ///
    /// Same as [`Loader::load`].
    pub async fn load_submodule(
        &self,
        sources: Vec<Arc<dyn PropertySource>>,
        hooks: SubmoduleHooks,
    ) -> PropResult<()> {
        let (session, completion) = self.start("submodule", &sources);
        let outcome = self.wait(&session, completion).await;
        hooks.notify(&outcome);
        outcome
    }

    /// Tear down every session this loader started.
    ///
    /// Pending sources stop, no further batches reach the store, and
    /// sessions that have not settled reject with [`PropError::Cancelled`].
    pub fn on_destroy(&self) {
        let sessions = std::mem::take(&mut *self.sessions.lock());
        for session in sessions {
            session.destroy();
        }
    }

    fn start(
        &self,
        label: &'static str,
        sources: &[Arc<dyn PropertySource>],
    ) -> (Arc<Session>, Completion) {
        let entries = sources
            .iter()
            .enumerate()
            .map(|(id, source)| SourceEntry::new(id, Arc::clone(source)))
            .collect();
        let (session, completion) = Session::start(label, self.service.clone(), entries);
        let mut sessions = self.sessions.lock();
        sessions.retain(|tracked| !tracked.is_finished());
        sessions.push(Arc::clone(&session));
        (session, completion)
    }

    /// Wait for `session` to settle, racing `max_load_time` when set.
    ///
    /// On timeout the session is settled according to the policy unless it
    /// settled in the meantime; either way the first outcome wins.
    async fn wait(&self, session: &Session, mut completion: Completion) -> PropResult<()> {
        let received = match self.options.max_load_time {
            Some(limit) => match time::timeout(limit, &mut completion).await {
                Ok(received) => received,
                Err(_elapsed) => {
                    session.expire(limit, self.options.timeout_policy);
                    completion.await
                }
            },
            None => completion.await,
        };
        received.unwrap_or_else(|_| Err(PropError::Cancelled.shared()))
    }
}

/// Assembles a [`Loader`].
#[derive(Debug)]
pub struct LoaderBuilder {
    service: PropertyService,
    sources: Vec<Arc<dyn PropertySource>>,
    options: LoaderOptions,
}

impl LoaderBuilder {
    /// Append a source.
    #[must_use]
    pub fn source(mut self, source: impl PropertySource + 'static) -> Self {
        self.sources.push(Arc::new(source));
        self
    }

    /// Append an already shared source.
    #[must_use]
    pub fn shared_source(mut self, source: Arc<dyn PropertySource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Append several shared sources in order.
    #[must_use]
    pub fn sources(
        mut self,
        sources: impl IntoIterator<Item = Arc<dyn PropertySource>>,
    ) -> Self {
        self.sources.extend(sources);
        self
    }

    /// Replace the loader options.
    #[must_use]
    pub fn options(mut self, options: LoaderOptions) -> Self {
        self.options = options;
        self
    }

    /// Bound how long each session blocks its caller.
    #[must_use]
    pub fn max_load_time(mut self, limit: Duration) -> Self {
        self.options = self.options.max_load_time(limit);
        self
    }

    /// Choose what happens when `max_load_time` elapses.
    #[must_use]
    pub fn timeout_policy(mut self, policy: TimeoutPolicy) -> Self {
        self.options = self.options.timeout_policy(policy);
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> Loader {
        Loader {
            service: self.service,
            sources: self.sources,
            options: self.options,
            sessions: Mutex::new(Vec::new()),
        }
    }
}
