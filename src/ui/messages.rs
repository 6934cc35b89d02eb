//! One-line console messages with an icon, coloured by severity.

use crate::utils::colors::{BLUE, BOLD, GREEN, RED, RESET, YELLOW};
use std::fmt::Display;

fn line(color: &str, icon: &str, msg: impl Display) -> String {
    format!("{color}{BOLD}{icon}{RESET} {msg}")
}

pub fn info(msg: impl Display) {
    println!("{}", line(BLUE, "ℹ️", msg));
}

pub fn success(msg: impl Display) {
    println!("{}", line(GREEN, "✅", msg));
}

pub fn warning(msg: impl Display) {
    println!("{}", line(YELLOW, "⚠️", msg));
}

/// Errors go to stderr so piped listings stay clean.
pub fn error(msg: impl Display) {
    eprintln!("{}", line(RED, "❌", msg));
}

/// Section header used above listings
pub fn header(msg: impl Display) {
    println!("\n{BLUE}{BOLD}=== {msg} ==={RESET}");
}
