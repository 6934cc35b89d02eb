//! Text rendering of the live display.

use super::state::{FeedState, FeedView};
use crate::models::attendance::AttendanceDetail;
use crate::utils::colors::{CYAN, GREY, RED, RESET, YELLOW, colorize_status};
use crate::utils::date::long_date;
use crate::utils::formatting::{bold, or_dash};
use crate::utils::table::visible_width;

const CARD_WIDTH: usize = 46;

fn card_line(out: &mut String, content: &str) {
    let pad = CARD_WIDTH.saturating_sub(visible_width(content));
    out.push_str(&format!("│ {}{} │\n", content, " ".repeat(pad)));
}

pub fn render_card(d: &AttendanceDetail) -> String {
    let mut out = String::new();
    let rule = "─".repeat(CARD_WIDTH + 2);

    out.push_str(&format!("┌{rule}┐\n"));
    card_line(&mut out, &bold(&d.student_name));
    card_line(&mut out, &format!("NIS    {}", d.nis));
    card_line(&mut out, &format!("Class  {}", or_dash(Some(d.placement().as_str()))));
    card_line(&mut out, &format!("Date   {}", long_date(&d.record.date)));
    card_line(
        &mut out,
        &format!(
            "In     {}    Out  {}",
            d.record.check_in_str(),
            d.record.check_out_str()
        ),
    );
    card_line(&mut out, &format!("Status {}", colorize_status(d.record.status)));
    out.push_str(&format!("└{rule}┘\n"));
    out
}

/// Full screen text for `state`. `fresh` marks a record that just replaced
/// the previous one.
pub fn render_state(state: &FeedState, school: &str, fresh: bool) -> String {
    render(state, school, fresh, true)
}

/// One-shot rendering for `live --once`: no retry hint, nothing reads stdin.
pub fn render_snapshot(state: &FeedState, school: &str) -> String {
    render(state, school, false, false)
}

fn render(state: &FeedState, school: &str, fresh: bool, interactive: bool) -> String {
    let mut out = format!("{CYAN}{school} · live attendance{RESET}\n");

    match state.view() {
        FeedView::Loading => out.push_str(&format!("{GREY}Loading…{RESET}\n")),
        FeedView::Empty => {
            out.push_str(&format!("{GREY}No attendance yet, waiting for the first tap.{RESET}\n"))
        }
        FeedView::Showing(d) => {
            if fresh {
                out.push_str(&format!("{YELLOW}🔔 New tap{RESET}\n"));
            }
            out.push_str(&render_card(d));
        }
        FeedView::Error(msg) => {
            out.push_str(&format!("{RED}Could not load attendance: {msg}{RESET}\n"));
            if interactive {
                out.push_str("Press r + Enter to retry.\n");
            }
        }
    }

    out
}
