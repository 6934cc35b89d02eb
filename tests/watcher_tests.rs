use chrono::{NaiveDate, NaiveTime};
use rollcall::errors::{AppError, AppResult};
use rollcall::live::{
    AttendanceSource, ChangeEvent, ChangeKind, ChangeNotifier, ChannelNotifier, FeedView,
    Subscription, WatchSettings, Watcher,
};
use rollcall::models::attendance::{AttendanceDetail, AttendanceRecord};
use rollcall::models::status::AttendanceStatus;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::sleep;

fn detail(id: &str, check_in: &str, status: AttendanceStatus) -> AttendanceDetail {
    AttendanceDetail {
        record: AttendanceRecord {
            id: id.to_string(),
            student_id: "s1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 8, 18).unwrap(),
            check_in: Some(NaiveTime::parse_from_str(check_in, "%H:%M:%S").unwrap()),
            check_out: None,
            status,
            note: None,
            created_at: "2025-08-18T08:00:00+07:00".to_string(),
        },
        student_name: "Budi Santoso".to_string(),
        nis: "1001".to_string(),
        rfid_uid: None,
        class_name: Some("X".to_string()),
        department_name: None,
        section_name: None,
    }
}

#[derive(Clone)]
enum Reply {
    Row(AttendanceDetail),
    NoRows,
    Fail(&'static str),
}

/// Answers every fetch with whatever the test put in `reply`.
struct ScriptedSource {
    reply: Mutex<Reply>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(reply),
            calls: AtomicUsize::new(0),
        })
    }

    fn set(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AttendanceSource for ScriptedSource {
    fn fetch_latest(&self) -> impl Future<Output = AppResult<AttendanceDetail>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.reply.lock().unwrap().clone();
        async move {
            match reply {
                Reply::Row(r) => Ok(r),
                Reply::NoRows => Err(AppError::NotFound("Attendance record".into())),
                Reply::Fail(msg) => Err(AppError::Feed(msg.into())),
            }
        }
    }
}

/// Holds every fetch until the test releases a permit.
struct GatedSource {
    gate: Semaphore,
    row: AttendanceDetail,
}

impl AttendanceSource for GatedSource {
    fn fetch_latest(&self) -> impl Future<Output = AppResult<AttendanceDetail>> + Send {
        async move {
            let _permit = self
                .gate
                .acquire()
                .await
                .map_err(|e| AppError::Feed(e.to_string()))?;
            Ok(self.row.clone())
        }
    }
}

struct BrokenNotifier;

impl ChangeNotifier for BrokenNotifier {
    fn subscribe(&self, _table: &str, _kinds: &[ChangeKind]) -> AppResult<Subscription> {
        Err(AppError::Feed("no realtime transport".into()))
    }
}

fn settings() -> WatchSettings {
    WatchSettings {
        refresh_delay: Duration::from_millis(500),
        poll_interval: Duration::from_secs(5),
    }
}

fn insert_event(id: &str) -> ChangeEvent {
    ChangeEvent {
        table: "attendance".to_string(),
        kind: ChangeKind::Insert,
        row_id: id.to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_empty_table_shows_empty_state() {
    let source = ScriptedSource::new(Reply::NoRows);
    let notifier = ChannelNotifier::default();
    let handle = Watcher::start(source.clone(), &notifier, settings());

    sleep(Duration::from_millis(10)).await;

    let st = handle.snapshot();
    assert_eq!(st.view(), &FeedView::Empty);
    assert!(!st.is_error());
    assert_eq!(source.calls(), 1);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_same_record_again_is_discarded() {
    let r1 = detail("a1", "08:00:01", AttendanceStatus::Present);
    let source = ScriptedSource::new(Reply::Row(r1));
    let notifier = ChannelNotifier::default();
    let handle = Watcher::start(source.clone(), &notifier, settings());
    let mut rx = handle.subscribe();

    sleep(Duration::from_millis(10)).await;
    assert_eq!(rx.borrow_and_update().transitions(), 1);

    // two poll ticks return the same row
    sleep(Duration::from_secs(11)).await;
    assert!(source.calls() >= 3);
    assert!(!rx.has_changed().unwrap());
    assert_eq!(handle.snapshot().transitions(), 1);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_new_record_from_poll_replaces_display_once() {
    let source = ScriptedSource::new(Reply::Row(detail("a1", "08:00:01", AttendanceStatus::Present)));
    let notifier = ChannelNotifier::default();
    let handle = Watcher::start(source.clone(), &notifier, settings());

    sleep(Duration::from_millis(10)).await;
    source.set(Reply::Row(detail("a2", "08:00:07", AttendanceStatus::Late)));

    sleep(Duration::from_secs(5)).await;
    let st = handle.snapshot();
    assert_eq!(st.record().map(|r| r.id()), Some("a2"));
    assert_eq!(st.transitions(), 2);

    sleep(Duration::from_secs(5)).await;
    assert_eq!(handle.snapshot().transitions(), 2);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_notification_refetches_after_delay() {
    let source = ScriptedSource::new(Reply::Row(detail("a1", "08:00:01", AttendanceStatus::Present)));
    let notifier = ChannelNotifier::default();
    let slow_poll = WatchSettings {
        poll_interval: Duration::from_secs(60),
        ..settings()
    };
    let handle = Watcher::start(source.clone(), &notifier, slow_poll);

    sleep(Duration::from_millis(10)).await;
    assert_eq!(handle.snapshot().record().map(|r| r.id()), Some("a1"));

    // five seconds later a2 is recorded and announced
    sleep(Duration::from_secs(5)).await;
    source.set(Reply::Row(detail("a2", "08:00:07", AttendanceStatus::Late)));
    assert_eq!(notifier.publish(insert_event("a2")), 1);

    sleep(Duration::from_millis(490)).await;
    assert_eq!(handle.snapshot().record().map(|r| r.id()), Some("a1"));

    sleep(Duration::from_millis(20)).await;
    let st = handle.snapshot();
    let shown = st.record().expect("a record is shown");
    assert_eq!(shown.id(), "a2");
    assert_eq!(shown.record.status, AttendanceStatus::Late);
    assert_eq!(st.transitions(), 2);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_delete_events_are_not_delivered() {
    let source = ScriptedSource::new(Reply::NoRows);
    let notifier = ChannelNotifier::default();
    let slow_poll = WatchSettings {
        poll_interval: Duration::from_secs(60),
        ..settings()
    };
    let handle = Watcher::start(source.clone(), &notifier, slow_poll);
    sleep(Duration::from_millis(10)).await;
    assert_eq!(source.calls(), 1);

    notifier.publish(ChangeEvent {
        kind: ChangeKind::Delete,
        ..insert_event("a1")
    });
    notifier.publish(ChangeEvent {
        table: "students".to_string(),
        ..insert_event("s1")
    });
    sleep(Duration::from_secs(1)).await;
    assert_eq!(source.calls(), 1);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_failure_shows_error_and_retry_refetches() {
    let source = ScriptedSource::new(Reply::Fail("connection reset"));
    let notifier = ChannelNotifier::default();
    let slow_poll = WatchSettings {
        poll_interval: Duration::from_secs(60),
        ..settings()
    };
    let handle = Watcher::start(source.clone(), &notifier, slow_poll);

    sleep(Duration::from_millis(10)).await;
    let st = handle.snapshot();
    assert!(st.is_error());
    assert!(matches!(st.view(), FeedView::Error(msg) if msg.contains("connection reset")));

    source.set(Reply::Row(detail("a1", "08:00:01", AttendanceStatus::Present)));
    let calls = source.calls();
    handle.retry();

    sleep(Duration::from_millis(10)).await;
    assert_eq!(source.calls(), calls + 1);
    assert_eq!(handle.snapshot().record().map(|r| r.id()), Some("a1"));

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_polling_continues_while_in_error() {
    let source = ScriptedSource::new(Reply::Fail("timeout"));
    let notifier = ChannelNotifier::default();
    let handle = Watcher::start(source.clone(), &notifier, settings());

    sleep(Duration::from_millis(10)).await;
    assert!(handle.snapshot().is_error());

    sleep(Duration::from_secs(10)).await;
    assert_eq!(source.calls(), 3);
    assert!(handle.snapshot().is_error());

    // backend recovers: the next poll brings the display back
    source.set(Reply::Row(detail("a1", "08:00:01", AttendanceStatus::Present)));
    sleep(Duration::from_secs(5)).await;
    assert_eq!(handle.snapshot().record().map(|r| r.id()), Some("a1"));

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_late_result_after_shutdown_is_ignored() {
    let source = Arc::new(GatedSource {
        gate: Semaphore::new(0),
        row: detail("a1", "08:00:01", AttendanceStatus::Present),
    });
    let notifier = ChannelNotifier::default();
    let handle = Watcher::start(source.clone(), &notifier, settings());
    let rx = handle.subscribe();

    // initial fetch is now waiting on the gate
    sleep(Duration::from_millis(10)).await;
    assert_eq!(rx.borrow().view(), &FeedView::Loading);

    handle.shutdown().await;

    source.gate.add_permits(10);
    sleep(Duration::from_secs(30)).await;
    assert_eq!(notifier.subscriber_count(), 0);

    let st = rx.borrow();
    assert_eq!(st.view(), &FeedView::Loading);
    assert_eq!(st.transitions(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_broken_change_feed_falls_back_to_polling() {
    let source = ScriptedSource::new(Reply::NoRows);
    let handle = Watcher::start(source.clone(), &BrokenNotifier, settings());

    sleep(Duration::from_millis(10)).await;
    assert_eq!(handle.snapshot().view(), &FeedView::Empty);

    source.set(Reply::Row(detail("a1", "08:00:01", AttendanceStatus::Present)));
    sleep(Duration::from_secs(5)).await;
    assert_eq!(handle.snapshot().record().map(|r| r.id()), Some("a1"));

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_unsubscribe_stops_delivery() {
    let notifier = ChannelNotifier::default();
    let mut sub = notifier
        .subscribe("attendance", &[ChangeKind::Insert, ChangeKind::Update])
        .unwrap();

    notifier.publish(insert_event("a1"));
    let ev = sub.next().await.expect("event delivered");
    assert_eq!(ev.row_id, "a1");

    sub.unsubscribe();
    sleep(Duration::from_millis(10)).await;
    assert_eq!(notifier.subscriber_count(), 0);
}

/// First fetch waits on `gate` and returns `first`; later fetches return
/// `second`, then `rest` from the third call on.
struct OverlapSource {
    gate: Semaphore,
    calls: AtomicUsize,
    first: AttendanceDetail,
    second: AttendanceDetail,
    rest: AttendanceDetail,
}

impl AttendanceSource for OverlapSource {
    fn fetch_latest(&self) -> impl Future<Output = AppResult<AttendanceDetail>> + Send {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        async move {
            match n {
                0 => {
                    let _permit = self
                        .gate
                        .acquire()
                        .await
                        .map_err(|e| AppError::Feed(e.to_string()))?;
                    Ok(self.first.clone())
                }
                1 => Ok(self.second.clone()),
                _ => Ok(self.rest.clone()),
            }
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_fetches_last_result_wins() {
    let source = Arc::new(OverlapSource {
        gate: Semaphore::new(0),
        calls: AtomicUsize::new(0),
        first: detail("a1", "07:00:00", AttendanceStatus::Present),
        second: detail("a2", "07:10:00", AttendanceStatus::Present),
        rest: detail("a3", "07:20:00", AttendanceStatus::Late),
    });
    let notifier = ChannelNotifier::default();
    let every_two = WatchSettings {
        refresh_delay: Duration::from_millis(500),
        poll_interval: Duration::from_secs(2),
    };
    let handle = Watcher::start(source.clone(), &notifier, every_two);

    // every visible state, in order
    let mut rx = handle.subscribe();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = {
        let seen = Arc::clone(&seen);
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let view = rx.borrow_and_update().view().clone();
                seen.lock().unwrap().push(view);
            }
        })
    };

    // the initial fetch hangs; a notification fetch completes meanwhile
    sleep(Duration::from_millis(10)).await;
    notifier.publish(insert_event("a2"));
    sleep(Duration::from_millis(600)).await;
    let st = handle.snapshot();
    assert_eq!(st.record().map(|r| r.id()), Some("a2"));
    assert_eq!(st.transitions(), 1);

    // poll at 2s brings a3, poll at 4s repeats it
    sleep(Duration::from_millis(3500)).await;
    let st = handle.snapshot();
    assert_eq!(st.record().map(|r| r.id()), Some("a3"));
    assert_eq!(st.transitions(), 2);
    assert_eq!(source.calls.load(Ordering::SeqCst), 4);

    // the initial fetch finally resolves and is the last write
    source.gate.add_permits(1);
    sleep(Duration::from_millis(10)).await;
    let st = handle.snapshot();
    assert_eq!(st.record().map(|r| r.id()), Some("a1"));
    assert_eq!(st.last_id(), Some("a1"));
    assert_eq!(st.transitions(), 3);

    handle.shutdown().await;
    sleep(Duration::from_millis(10)).await;
    recorder.abort();

    let seen = seen.lock().unwrap();
    assert!(!seen.is_empty());
    assert!(
        seen.iter()
            .all(|v| matches!(v, FeedView::Showing(_))),
        "unexpected state in {seen:?}"
    );
    let ids: Vec<&str> = seen
        .iter()
        .filter_map(|v| match v {
            FeedView::Showing(r) => Some(r.id()),
            _ => None,
        })
        .collect();
    assert_eq!(ids, ["a2", "a3", "a1"]);
}
