//! Terminal rendering helpers.

use chrono::Duration;
use eventscope_core::event::Event;
use owo_colors::OwoColorize;

/// One-line summary for an event listing.
pub fn event_line(event: &Event) -> String {
    let when = format!(
        "{} {}",
        event.start_date.format("%a %b %-d"),
        event.start_time.format("%H:%M")
    );
    let id_tag = format!("[{}]", event.id);
    format!("  {}  {} {}", when, event.title, id_tag.dimmed())
}

/// Human label for the time left before purge (e.g. "23h 59m").
pub fn remaining_label(remaining: Duration) -> String {
    let secs = remaining.num_seconds().max(0) as u64;
    let rounded = std::time::Duration::from_secs(secs - secs % 60);

    if rounded.is_zero() {
        return "less than a minute".to_string();
    }
    humantime::format_duration(rounded).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_label_rounds_to_minutes() {
        let remaining = Duration::hours(23) + Duration::minutes(59) + Duration::seconds(30);
        assert_eq!(remaining_label(remaining), "23h 59m");
    }

    #[test]
    fn remaining_label_for_the_last_seconds() {
        assert_eq!(remaining_label(Duration::seconds(45)), "less than a minute");
    }

    #[test]
    fn remaining_label_never_goes_negative() {
        assert_eq!(remaining_label(Duration::seconds(-5)), "less than a minute");
    }
}
