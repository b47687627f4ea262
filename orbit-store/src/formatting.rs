use chrono::{DateTime, Duration, Utc};

/// Relative timestamp for feed items and notifications
pub fn format_time_ago(timestamp: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let elapsed = *now - *timestamp;

    if elapsed < Duration::minutes(1) {
        "just now".to_string()
    } else if elapsed < Duration::hours(1) {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed < Duration::days(1) {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed < Duration::days(7) {
        format!("{}d ago", elapsed.num_days())
    } else {
        timestamp.format("%b %-d").to_string()
    }
}

/// Timestamp for chat bubbles and conversation lists
pub fn format_message_time(timestamp: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let day = timestamp.date_naive();
    let today = now.date_naive();

    if day == today {
        timestamp.format("%H:%M").to_string()
    } else if today.pred_opt() == Some(day) {
        "Yesterday".to_string()
    } else if day < today && today - day < Duration::days(7) {
        timestamp.format("%A").to_string()
    } else {
        timestamp.format("%b %-d").to_string()
    }
}

/// Abbreviate counters: 999, 1.2K, 3.4M
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000 {
        abbreviate(n as f64 / 1_000_000.0, "M")
    } else if n >= 1_000 {
        abbreviate(n as f64 / 1_000.0, "K")
    } else {
        n.to_string()
    }
}

fn abbreviate(value: f64, suffix: &str) -> String {
    let text = format!("{:.1}", value);
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{}{}", text, suffix)
}
