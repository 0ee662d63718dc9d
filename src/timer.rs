//! Countdown timer for focused work sessions.
//!
//! Independent of the task store: computes a deadline once, then redraws
//! the remaining time in place once per second until the deadline elapses.

use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor::MoveToColumn,
    execute,
    terminal::{Clear, ClearType},
};

use crate::error::{Result, TodoError};

const DEFAULT_MINUTES: u64 = 3;

/// Runs a countdown; bare `timer` means the default duration.
pub fn handle_timer(rest: &[&str], out: &mut impl Write) -> Result<()> {
    let minutes = match rest {
        [] => DEFAULT_MINUTES,
        [raw] => match raw.parse::<u64>() {
            Ok(m) if m > 0 => m,
            _ => {
                return Err(TodoError::InvalidUsage(
                    "timer takes a whole number of minutes".into(),
                ))
            }
        },
        _ => return Err(TodoError::InvalidUsage("try: timer or timer <minutes>".into())),
    };
    writeln!(out, "Timer started for {minutes} minute(s)")?;
    run_countdown(out, Duration::from_secs(minutes * 60))
}

fn run_countdown(out: &mut impl Write, duration: Duration) -> Result<()> {
    let deadline = Instant::now() + duration;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        execute!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        write!(out, "{} remaining", format_remaining(remaining))?;
        out.flush()?;
        // Wake on the next second or the deadline, whichever comes first.
        thread::sleep(remaining.min(Duration::from_secs(1)));
    }
    execute!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    writeln!(out, "Time's up!")?;
    Ok(())
}

/// Formats a remaining duration as `MM:SS`, rounding partial seconds up.
fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(Duration::from_secs(180)), "03:00");
        assert_eq!(format_remaining(Duration::from_secs(61)), "01:01");
        assert_eq!(format_remaining(Duration::from_millis(400)), "00:01");
        assert_eq!(format_remaining(Duration::ZERO), "00:00");
    }

    #[test]
    fn test_countdown_terminates_and_announces() {
        let mut out = Vec::new();
        run_countdown(&mut out, Duration::from_millis(30)).unwrap();
        let rendered = String::from_utf8(out).unwrap();
        assert!(rendered.contains("remaining"));
        assert!(rendered.contains("Time's up!"));
    }

    #[test]
    fn test_rejects_non_numeric_duration() {
        let mut out = Vec::new();
        let err = handle_timer(&["soon"], &mut out).unwrap_err();
        assert!(matches!(err, TodoError::InvalidUsage(_)));
    }

    #[test]
    fn test_rejects_zero_minutes() {
        let mut out = Vec::new();
        let err = handle_timer(&["0"], &mut out).unwrap_err();
        assert!(matches!(err, TodoError::InvalidUsage(_)));
    }
}
