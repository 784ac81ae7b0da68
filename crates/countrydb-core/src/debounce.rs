// crates/countrydb-core/src/debounce.rs

//! # Debounced Input Synchronizer
//!
//! The search box writes into a local buffer on every keystroke; the buffer
//! is committed to the query string only once typing has paused for the
//! quiet period. Committing resets `page` to 1.
//!
//! Two pieces:
//!
//! - [`DebouncedSearch`]: the state machine, driven by explicit instants
//! - [`SearchSynchronizer`]: a tokio task running the machine against a
//!   [`Navigator`]
//!
//! When the committed text changes underneath a pending buffer (back/forward
//! navigation), the external value wins and the buffer is discarded.

use crate::config::Config;
use crate::query::{decode, encode, Navigator, QueryUpdate};
use log::debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

/// Observable state of the synchronizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// The buffer holds text that has not been committed yet.
    Pending,
    /// Buffer and committed text agree.
    Settled,
}

/// The debounce state machine.
#[derive(Debug, Clone)]
pub struct DebouncedSearch {
    buffer: String,
    committed: String,
    deadline: Option<Instant>,
    quiet: Duration,
}

impl DebouncedSearch {
    pub fn new(committed: impl Into<String>, quiet: Duration) -> Self {
        let committed = committed.into();
        Self {
            buffer: committed.clone(),
            committed,
            deadline: None,
            quiet,
        }
    }

    /// A keystroke: replace the buffer and restart the quiet period.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.buffer = text.into();
        self.deadline = Some(now + self.quiet);
    }

    /// The committed text as currently seen in the query string.
    ///
    /// If it differs from what this machine last committed, it came from
    /// somewhere else: adopt it and drop any pending edit. Returns whether
    /// a resync happened.
    pub fn external(&mut self, committed: &str) -> bool {
        if committed == self.committed {
            return false;
        }
        if self.state() == SyncState::Pending {
            debug!(
                "search buffer {:?} discarded for external value {committed:?}",
                self.buffer
            );
        }
        self.committed = committed.to_string();
        self.buffer = self.committed.clone();
        self.deadline = None;
        true
    }

    /// Called when the timer may have expired. Returns the text to commit,
    /// if the quiet period is over and the buffer differs.
    pub fn fire(&mut self, now: Instant) -> Option<String> {
        match self.deadline {
            Some(deadline) if now >= deadline => self.deadline = None,
            _ => return None,
        }
        if self.buffer == self.committed {
            return None;
        }
        self.committed = self.buffer.clone();
        Some(self.committed.clone())
    }

    /// Drops the running timer; nothing will be committed until new input.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn state(&self) -> SyncState {
        if self.buffer == self.committed {
            SyncState::Settled
        } else {
            SyncState::Pending
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

// -----------------------------------------------------------------------------
// ASYNC DRIVER
// -----------------------------------------------------------------------------

#[derive(Debug)]
enum SearchEvent {
    Input(String),
    LocationChanged,
}

/// Runs a [`DebouncedSearch`] on the tokio runtime against a navigator.
///
/// Dropping the synchronizer aborts its task, so a pending timer can never
/// commit after teardown.
#[derive(Debug)]
pub struct SearchSynchronizer {
    events: mpsc::UnboundedSender<SearchEvent>,
    task: JoinHandle<()>,
}

impl SearchSynchronizer {
    /// Spawns the driver. Must be called from within a tokio runtime.
    pub fn spawn<N>(navigator: Arc<N>, config: Config) -> Self
    where
        N: Navigator + ?Sized + 'static,
    {
        let (events, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(navigator, config, rx));
        Self { events, task }
    }

    /// Current full text of the search box.
    pub fn input(&self, text: impl Into<String>) {
        // The receiver only goes away with the task, i.e. after teardown.
        let _ = self.events.send(SearchEvent::Input(text.into()));
    }

    /// Signals that the location moved without us (back/forward).
    pub fn location_changed(&self) {
        let _ = self.events.send(SearchEvent::LocationChanged);
    }

    /// Stops the driver, discarding any pending input.
    pub fn teardown(self) {
        // Drop does the work.
    }
}

impl Drop for SearchSynchronizer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<N>(navigator: Arc<N>, config: Config, mut rx: mpsc::UnboundedReceiver<SearchEvent>)
where
    N: Navigator + ?Sized,
{
    let committed = decode(&navigator.location(), &config).search_text;
    let mut machine = DebouncedSearch::new(committed, config.debounce);

    loop {
        let deadline = machine.deadline();
        tokio::select! {
            event = rx.recv() => match event {
                Some(SearchEvent::Input(text)) => machine.input(text, Instant::now()),
                Some(SearchEvent::LocationChanged) => {
                    let external = decode(&navigator.location(), &config).search_text;
                    machine.external(&external);
                }
                None => break,
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                // Reconcile first: an unannounced external change still wins.
                let location = navigator.location();
                if machine.external(&decode(&location, &config).search_text) {
                    continue;
                }
                if let Some(text) = machine.fire(Instant::now()) {
                    let href = encode(
                        &location,
                        &[QueryUpdate::Query(text), QueryUpdate::Page(1)],
                        &config,
                    );
                    debug!("search committed: {href:?}");
                    navigator.replace(&href);
                }
            }
        }
    }
}
