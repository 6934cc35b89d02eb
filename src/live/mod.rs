pub mod notifier;
pub mod render;
pub mod source;
pub mod state;
pub mod watcher;

pub use notifier::{
    ChangeEvent, ChangeKind, ChangeNotifier, ChannelNotifier, SqliteChangeFeed, Subscription,
};
pub use source::{AttendanceSource, SqliteAttendanceSource};
pub use state::{FeedState, FeedView};
pub use watcher::{WatchSettings, Watcher, WatcherHandle};
