//! Change notifications: an abstract feed plus two implementations, an
//! in-process broadcast channel and a tail of SQLite's `change_log`.

use crate::db::changes::{CHANGE_LOG_KEEP_SECS, changes_since, max_change_id, prune_changes};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const SUBSCRIPTION_BUFFER: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl ChangeKind {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "insert" => Some(ChangeKind::Insert),
            "update" => Some(ChangeKind::Update),
            "delete" => Some(ChangeKind::Delete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub table: String,
    pub kind: ChangeKind,
    pub row_id: String,
}

/// Anything that can deliver change events for one table.
pub trait ChangeNotifier: Send + Sync {
    /// Start delivering `kinds` events on `table`. Must be called inside a
    /// tokio runtime.
    fn subscribe(&self, table: &str, kinds: &[ChangeKind]) -> AppResult<Subscription>;
}

/// A live subscription. Dropping it has the same effect as `unsubscribe`.
#[derive(Debug)]
pub struct Subscription {
    rx: mpsc::Receiver<ChangeEvent>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    fn new(rx: mpsc::Receiver<ChangeEvent>, task: JoinHandle<()>) -> Self {
        Self {
            rx,
            task: Some(task),
        }
    }

    /// Next event, `None` once the feed is gone.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        self.rx.recv().await
    }

    pub fn unsubscribe(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.rx.close();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.stop();
    }
}

/// In-process notifier; `publish` is what a writer calls after a change.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: broadcast::Sender<ChangeEvent>,
}

impl Default for ChannelNotifier {
    fn default() -> Self {
        Self::new(SUBSCRIPTION_BUFFER)
    }
}

impl ChannelNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Returns how many subscribers saw the event.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl ChangeNotifier for ChannelNotifier {
    fn subscribe(&self, table: &str, kinds: &[ChangeKind]) -> AppResult<Subscription> {
        let mut source = self.tx.subscribe();
        let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let table = table.to_string();
        let kinds = kinds.to_vec();

        let task = tokio::spawn(async move {
            loop {
                match source.recv().await {
                    Ok(ev) => {
                        if ev.table == table && kinds.contains(&ev.kind) && tx.send(ev).await.is_err() {
                            break;
                        }
                    }
                    // Missed events are covered by the poll
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "change channel lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Ok(Subscription::new(rx, task))
    }
}

/// Tails `change_log` (filled by triggers on `attendance`) every `tick`, so
/// a tap recorded by another process reaches the live display.
#[derive(Debug, Clone)]
pub struct SqliteChangeFeed {
    db_path: PathBuf,
    tick: Duration,
}

impl SqliteChangeFeed {
    pub fn new(db_path: impl Into<PathBuf>, tick: Duration) -> Self {
        Self {
            db_path: db_path.into(),
            tick,
        }
    }
}

impl ChangeNotifier for SqliteChangeFeed {
    fn subscribe(&self, table: &str, kinds: &[ChangeKind]) -> AppResult<Subscription> {
        let pool = DbPool::new(&self.db_path.to_string_lossy())?;
        match prune_changes(&pool.conn, CHANGE_LOG_KEEP_SECS) {
            Ok(0) => {}
            Ok(n) => debug!(rows = n, "pruned old change rows"),
            Err(e) => warn!(error = %e, "could not prune change log"),
        }
        // Only changes made after subscribing are delivered
        let mut last_id = max_change_id(&pool.conn)?;

        let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let table = table.to_string();
        let kinds = kinds.to_vec();
        let tick = self.tick;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(tick);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            let mut pool = Some(pool);

            loop {
                ticker.tick().await;

                let Some(p) = pool.take() else { break };
                let t = table.clone();
                let joined = tokio::task::spawn_blocking(move || {
                    let res = changes_since(&p.conn, last_id, &t);
                    (p, res)
                })
                .await;

                let (p, res) = match joined {
                    Ok(v) => v,
                    Err(e) => {
                        warn!(error = %e, "change feed worker failed");
                        break;
                    }
                };
                pool = Some(p);

                let rows = match res {
                    Ok(rows) => rows,
                    Err(e) => {
                        warn!(error = %e, "change feed query failed");
                        continue;
                    }
                };

                for row in rows {
                    last_id = row.id;
                    let Some(kind) = ChangeKind::from_db_str(&row.op) else {
                        continue;
                    };
                    if !kinds.contains(&kind) {
                        continue;
                    }
                    debug!(id = row.id, op = %row.op, row_id = %row.row_id, "change");
                    let ev = ChangeEvent {
                        table: row.table_name,
                        kind,
                        row_id: row.row_id,
                    };
                    if tx.send(ev).await.is_err() {
                        return;
                    }
                }
            }
        });

        Ok(Subscription::new(rx, task))
    }
}
