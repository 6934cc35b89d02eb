//! Keeps a `FeedState` current from three triggers: the initial load, the
//! change feed (after a short read-after-write delay) and a periodic poll.
//! Overlapping fetches are allowed; whichever finishes last wins.

use super::notifier::{ChangeKind, ChangeNotifier, Subscription};
use super::source::AttendanceSource;
use super::state::FeedState;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::attendance::AttendanceDetail;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

pub const WATCHED_TABLE: &str = "attendance";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchSettings {
    /// Wait between a change notification and the fetch it triggers
    pub refresh_delay: Duration,
    pub poll_interval: Duration,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            refresh_delay: Duration::from_millis(500),
            poll_interval: Duration::from_secs(5),
        }
    }
}

impl WatchSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            refresh_delay: cfg.refresh_delay(),
            poll_interval: cfg.poll_interval(),
        }
    }
}

struct Shared {
    state: watch::Sender<FeedState>,
    closed: AtomicBool,
}

impl Shared {
    /// Apply a fetch result unless the watcher is already torn down.
    fn apply(&self, result: AppResult<AttendanceDetail>) {
        self.state.send_if_modified(|state| {
            if self.closed.load(Ordering::SeqCst) {
                return false;
            }
            state.apply(result)
        });
    }

    fn begin_retry(&self) {
        self.state.send_if_modified(|state| {
            !self.closed.load(Ordering::SeqCst) && state.begin_retry()
        });
    }

    /// Mark closed while holding the state lock, so an in-flight apply
    /// either lands before this or not at all.
    fn close(&self) {
        self.state.send_if_modified(|_| {
            self.closed.store(true, Ordering::SeqCst);
            false
        });
    }
}

pub struct Watcher;

impl Watcher {
    /// Spawn the watcher on the current tokio runtime.
    ///
    /// A notifier that fails to subscribe is logged and skipped: the poll
    /// alone keeps the display fresh.
    pub fn start<S, N>(source: Arc<S>, notifier: &N, settings: WatchSettings) -> WatcherHandle
    where
        S: AttendanceSource,
        N: ChangeNotifier + ?Sized,
    {
        let subscription =
            match notifier.subscribe(WATCHED_TABLE, &[ChangeKind::Insert, ChangeKind::Update]) {
                Ok(sub) => Some(sub),
                Err(e) => {
                    warn!(error = %e, "change feed unavailable, polling only");
                    None
                }
            };

        let (state_tx, _) = watch::channel(FeedState::new());
        let shared = Arc::new(Shared {
            state: state_tx,
            closed: AtomicBool::new(false),
        });

        let (retry_tx, retry_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(false);

        let task = tokio::spawn(run(
            Arc::clone(&shared),
            source,
            subscription,
            settings,
            retry_rx,
            stop_rx,
        ));

        WatcherHandle {
            shared,
            retry_tx,
            stop_tx,
            task: Some(task),
        }
    }
}

fn spawn_fetch<S: AttendanceSource>(
    fetches: &mut JoinSet<()>,
    shared: &Arc<Shared>,
    source: &Arc<S>,
    delay: Duration,
) {
    let shared = Arc::clone(shared);
    let source = Arc::clone(source);
    fetches.spawn(async move {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let result = source.fetch_latest().await;
        shared.apply(result);
    });
}

async fn next_change(sub: &mut Option<Subscription>) -> Option<()> {
    match sub {
        Some(s) => s.next().await.map(|ev| {
            debug!(row_id = %ev.row_id, kind = ?ev.kind, "change notification");
        }),
        None => std::future::pending().await,
    }
}

async fn run<S: AttendanceSource>(
    shared: Arc<Shared>,
    source: Arc<S>,
    mut subscription: Option<Subscription>,
    settings: WatchSettings,
    mut retry_rx: mpsc::UnboundedReceiver<()>,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut fetches = JoinSet::new();
    spawn_fetch(&mut fetches, &shared, &source, Duration::ZERO);

    let mut poll = tokio::time::interval_at(
        Instant::now() + settings.poll_interval,
        settings.poll_interval,
    );
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut feed_open = subscription.is_some();

    loop {
        tokio::select! {
            _ = stop_rx.changed() => break,
            change = next_change(&mut subscription), if feed_open => {
                match change {
                    Some(()) => spawn_fetch(&mut fetches, &shared, &source, settings.refresh_delay),
                    None => {
                        warn!("change feed closed, polling only");
                        feed_open = false;
                    }
                }
            }
            _ = poll.tick() => spawn_fetch(&mut fetches, &shared, &source, Duration::ZERO),
            Some(()) = retry_rx.recv() => {
                shared.begin_retry();
                spawn_fetch(&mut fetches, &shared, &source, Duration::ZERO);
            }
            Some(_) = fetches.join_next(), if !fetches.is_empty() => {}
        }
    }

    if let Some(sub) = subscription.take() {
        sub.unsubscribe();
    }
    fetches.abort_all();
    debug!("watcher stopped");
}

/// Control side of a running watcher.
pub struct WatcherHandle {
    shared: Arc<Shared>,
    retry_tx: mpsc::UnboundedSender<()>,
    stop_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl WatcherHandle {
    pub fn snapshot(&self) -> FeedState {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified on every visible state change.
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.shared.state.subscribe()
    }

    /// Leave the error state and fetch again.
    pub fn retry(&self) {
        let _ = self.retry_tx.send(());
    }

    /// Cancel the subscription, the poll and every pending fetch. Results
    /// arriving afterwards are dropped.
    pub async fn shutdown(mut self) {
        self.shared.close();
        let _ = self.stop_tx.send(true);
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
            && !e.is_cancelled()
        {
            warn!(error = %e, "watcher task ended abnormally");
        }
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        self.shared.close();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
