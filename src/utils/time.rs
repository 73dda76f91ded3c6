//! Hours helpers: parsing `HH:MM` fields, formatting minutes.

/// Parse an `H:MM` / `HH:MM` duration into minutes.
///
/// Hours may exceed 23 (weekly totals); minutes must be two digits below 60.
pub fn parse_hours(t: &str) -> Option<i64> {
    let (h, m) = t.trim().split_once(':')?;

    if h.is_empty() || h.len() > 3 || m.len() != 2 {
        return None;
    }
    if !h.chars().all(|c| c.is_ascii_digit()) || !m.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let hours: i64 = h.parse().ok()?;
    let minutes: i64 = m.parse().ok()?;
    if minutes >= 60 {
        return None;
    }

    Some(hours * 60 + minutes)
}

pub fn format_minutes(mins: i64) -> String {
    let sign = if mins < 0 { "-" } else { "" };
    let m = mins.abs();
    format!("{}{:02}:{:02}", sign, m / 60, m % 60)
}

pub fn minutes_to_decimal(mins: i64) -> f64 {
    mins as f64 / 60.0
}
