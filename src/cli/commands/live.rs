use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::live::render::{render_snapshot, render_state};
use crate::live::{
    AttendanceSource, FeedState, SqliteAttendanceSource, SqliteChangeFeed, WatchSettings, Watcher,
};
use crate::ui::messages::info;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Live { once, for_secs } = cmd else {
        return Ok(());
    };

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = rt.block_on(run_live(cfg, *once, for_secs.map(Duration::from_secs)));

    // stdin is read on a blocking thread that may still wait for a line
    rt.shutdown_background();
    result
}

async fn run_live(cfg: &Config, once: bool, limit: Option<Duration>) -> AppResult<()> {
    let source = Arc::new(SqliteAttendanceSource::new(&cfg.database));

    if once {
        let mut state = FeedState::new();
        state.apply(source.fetch_latest().await);
        print!("{}", render_snapshot(&state, &cfg.school_name));
        return Ok(());
    }

    let feed = SqliteChangeFeed::new(&cfg.database, cfg.feed_tick());
    let handle = Watcher::start(source, &feed, WatchSettings::from_config(cfg));
    let mut states = handle.subscribe();

    info("Live display started. r + Enter retries, q + Enter (or Ctrl-C) quits.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut shown = states.borrow_and_update().clone();
    print!("{}", render_state(&shown, &cfg.school_name, false));

    let deadline = async {
        match limit {
            Some(d) => tokio::time::sleep(d).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let next = states.borrow_and_update().clone();
                let fresh = next.transitions() > shown.transitions();
                print!("{}", render_state(&next, &cfg.school_name, fresh));
                shown = next;
            }
            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(l)) => match l.trim() {
                        "r" | "R" => handle.retry(),
                        "q" | "Q" => break,
                        _ => {}
                    },
                    Ok(None) => stdin_open = false,
                    Err(e) => {
                        stdin_open = false;
                        tracing::warn!(error = %e, "stdin closed");
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
            _ = &mut deadline => break,
        }
    }

    handle.shutdown().await;
    info("Live display stopped.");
    Ok(())
}

