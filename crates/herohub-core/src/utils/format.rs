use chrono::{DateTime, Utc};

use crate::models::{PowerStat, Superhero};

/// Truncate a string to a maximum length in characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format an optional string, returning a default if None or blank
pub fn format_optional(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "-")
        .unwrap_or(default)
        .to_string()
}

/// Format a timestamp as "Jan 02, 2024"
pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(dt) => dt.format("%b %d, %Y").to_string(),
        None => "-".to_string(),
    }
}

/// A stat value, or "-" when the catalog has none
pub fn format_stat(value: Option<i32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// One line with all six power stats, e.g. "INT 50  STR 40 ... (total 210)"
pub fn stat_line(hero: &Superhero) -> String {
    let stats: Vec<String> = PowerStat::ALL
        .iter()
        .map(|stat| {
            let label: String = stat.as_str().chars().take(3).collect();
            format!("{} {}", label.to_ascii_uppercase(), format_stat(hero.stat(*stat)))
        })
        .collect();
    format!("{}  (total {})", stats.join("  "), hero.total_power())
}
