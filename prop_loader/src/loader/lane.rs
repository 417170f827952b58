//! Per-source pipelines and the ordered lane driver.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::watch;
use tracing::debug;

use super::session::{CancelState, Session};
use crate::{PropertySource, SourceOptions};

/// A source as seen by one session.
pub(super) struct SourceEntry {
    pub(super) id: usize,
    pub(super) name: String,
    pub(super) options: SourceOptions,
    pub(super) source: Arc<dyn PropertySource>,
}

impl SourceEntry {
    /// Snapshot name and options so they stay stable for the whole session.
    pub(super) fn new(id: usize, source: Arc<dyn PropertySource>) -> Self {
        Self {
            id,
            name: source.name().into_owned(),
            options: source.options(),
            source,
        }
    }
}

impl std::fmt::Debug for SourceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceEntry")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Run ordered sources one after another.
///
/// The next source's `load()` is only called once the previous sequence has
/// ended, so an endless stream blocks the rest of the lane.
pub(super) async fn drive_ordered(session: Arc<Session>, entries: Vec<SourceEntry>) {
    for entry in &entries {
        if session.halts(entry.id) {
            debug!(source = %entry.name, "ordered lane halted");
            break;
        }
        drive_source(&session, entry).await;
    }
}

/// Load one source and feed every batch it emits into the session.
///
/// The pipeline stops on the first error, at the end of the sequence, or
/// as soon as the session halts this source.
pub(super) async fn drive_source(session: &Session, entry: &SourceEntry) {
    if session.halts(entry.id) {
        return;
    }
    let mut cancel = session.cancellation();
    let mut batches = entry.source.load().into_stream();
    loop {
        let next = tokio::select! {
            biased;
            () = halted(&mut cancel, entry.id) => {
                debug!(source = %entry.name, "property source halted");
                return;
            }
            next = batches.next() => next,
        };
        match next {
            Some(Ok(batch)) => session.apply_batch(entry, batch),
            Some(Err(cause)) => {
                session.fail_source(entry, cause);
                return;
            }
            None => {
                session.finish_source(entry);
                return;
            }
        }
    }
}

async fn halted(cancel: &mut watch::Receiver<CancelState>, source: usize) {
    let signalled = cancel.wait_for(|state| state.halts(source)).await.is_ok();
    if !signalled {
        // The session is gone, so nothing can cancel this source any more.
        std::future::pending::<()>().await;
    }
}
